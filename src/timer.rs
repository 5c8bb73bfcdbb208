//! Elapsed-time accumulators driven by the per-frame `dt`.
//!
//! Both timers ignore negative or non-finite `dt` and tolerate `dt == 0`.
//! Threshold comparisons allow [`TIMER_EPSILON`] of slack so that summing
//! frame deltas (e.g. 180 × 1/60 s) lands on the boundary instead of just short.

pub const TIMER_EPSILON: f64 = 1e-9;

/// Clamps a frame delta to a usable value: negative or non-finite becomes 0.
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Counts down after being triggered; ready again once the countdown hits zero.
#[derive(Clone, Copy, Debug)]
pub struct Cooldown {
    duration: f64,
    remaining: f64,
}

impl Cooldown {
    /// Starts ready.
    pub fn new(duration: f64) -> Self {
        Cooldown { duration, remaining: 0.0 }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= TIMER_EPSILON
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, dt: f64) {
        self.remaining = (self.remaining - sanitize_dt(dt)).max(0.0);
        if self.remaining <= TIMER_EPSILON {
            self.remaining = 0.0;
        }
    }
}

/// Fires once per `period` of accumulated time.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: f64,
    elapsed: f64,
}

impl Interval {
    pub fn new(period: f64) -> Self {
        Interval { period, elapsed: 0.0 }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances the accumulator and returns how many period boundaries were crossed,
    /// saturating at `u32::MAX`.
    pub fn tick(&mut self, dt: f64) -> u32 {
        if self.period <= 0.0 {
            return 0;
        }
        self.elapsed += sanitize_dt(dt);
        if self.elapsed + TIMER_EPSILON < self.period {
            return 0;
        }
        let crossed = ((self.elapsed + TIMER_EPSILON) / self.period).floor();
        self.elapsed = (self.elapsed - crossed * self.period).max(0.0);
        // Huge accumulators lose the remainder to rounding
        if !(self.elapsed < self.period) {
            self.elapsed = 0.0;
        }
        // Float to int `as` casts saturate
        crossed as u32
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_ready_exactly_at_duration() {
        let mut cooldown = Cooldown::new(0.15);
        assert!(cooldown.is_ready());
        cooldown.trigger();
        assert!(!cooldown.is_ready());
        cooldown.tick(0.05);
        cooldown.tick(0.05);
        assert!(!cooldown.is_ready());
        cooldown.tick(0.05);
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.remaining(), 0.0);
    }

    #[test]
    fn test_cooldown_ignores_negative_and_nan_dt() {
        let mut cooldown = Cooldown::new(1.0);
        cooldown.trigger();
        cooldown.tick(-5.0);
        cooldown.tick(f64::NAN);
        cooldown.tick(0.0);
        assert_eq!(cooldown.remaining(), 1.0);
    }

    #[test]
    fn test_interval_counts_each_boundary_once() {
        let mut interval = Interval::new(3.0);
        let mut fired = 0;
        for _ in 0..180 {
            fired += interval.tick(1.0 / 60.0);
        }
        assert_eq!(fired, 1);
        assert_eq!(interval.tick(2.9), 0);
        assert_eq!(interval.tick(0.1), 1);
    }

    #[test]
    fn test_interval_large_dt_fires_multiple_times() {
        let mut interval = Interval::new(3.0);
        assert_eq!(interval.tick(9.5), 3);
        assert!((interval.elapsed() - 0.5).abs() < 1e-9);
        interval.reset();
        assert_eq!(interval.elapsed(), 0.0);
    }

    #[test]
    fn test_interval_huge_dt_saturates_and_keeps_a_sane_remainder() {
        let mut interval = Interval::new(3.0);
        assert_eq!(interval.tick(1e17), u32::MAX);
        assert!((0.0..3.0).contains(&interval.elapsed()));
        assert_eq!(interval.tick(f64::MAX), u32::MAX);
        assert!((0.0..3.0).contains(&interval.elapsed()));

        let mut interval = Interval::new(3.0);
        assert_eq!(interval.tick(3e9), 1_000_000_000);
        assert!(interval.elapsed() < 3.0);
    }
}
