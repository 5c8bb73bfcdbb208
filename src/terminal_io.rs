use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::{debug, error};

use crate::engine::Controls;

/// Discrete input gathered over one frame. Terminals do not report key releases,
/// so a key seen at least once during the frame counts as held for that frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub controls: Controls,
    pub pause_toggled: bool,
    pub quit: bool,
}

impl FrameInput {
    pub fn apply(&mut self, event: &Event) {
        if let Event::Key(KeyEvent { code, kind, .. }) = event {
            if *kind == KeyEventKind::Release {
                return;
            }
            match code {
                KeyCode::Left | KeyCode::Char('a') => self.controls.rotate_left = true,
                KeyCode::Right | KeyCode::Char('d') => self.controls.rotate_right = true,
                KeyCode::Char(' ') => self.controls.fire = true,
                // Two presses in one frame cancel out
                KeyCode::Char('p') => self.pause_toggled = !self.pause_toggled,
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                _ => {}
            }
        }
    }
}

// --- SimulatedInput for headless runs ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    /// Fires while turning right for a second, pauses for ten frames, fires while
    /// turning left, then quits at frame 240.
    pub fn demo_script() -> Self {
        let key = |code: KeyCode| Event::Key(code.into());
        let mut events: HashMap<u64, Vec<Event>> = HashMap::new();
        for frame in 1..=60 {
            events.insert(frame, vec![key(KeyCode::Right), key(KeyCode::Char(' '))]);
        }
        events.insert(90, vec![key(KeyCode::Char('p'))]);
        events.insert(100, vec![key(KeyCode::Char('p'))]);
        for frame in 101..=180 {
            events.insert(frame, vec![key(KeyCode::Left), key(KeyCode::Char(' '))]);
        }
        events.insert(240, vec![key(KeyCode::Char('q'))]);
        SimulatedInput::new(events)
    }

    pub fn read_frame(&mut self, frame_count: u64) -> FrameInput {
        let mut input = FrameInput::default();
        if let Some(events) = self.events.remove(&frame_count) {
            for event in &events {
                input.apply(event);
            }
        }
        input
    }
}

pub enum InputSource {
    Terminal,
    Simulated(SimulatedInput),
}

impl InputSource {
    /// Collects the input for `frame_count`. The terminal source blocks for up to
    /// `budget` waiting for events, which also paces the game loop.
    pub fn collect(&mut self, frame_count: u64, budget: Duration) -> io::Result<FrameInput> {
        match self {
            InputSource::Simulated(script) => Ok(script.read_frame(frame_count)),
            InputSource::Terminal => {
                let deadline = Instant::now() + budget;
                let mut input = FrameInput::default();
                loop {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    if !event::poll(remaining).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                        break;
                    }
                    let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
                    debug!("Frame {}: {:?}", frame_count, event);
                    input.apply(&event);
                }
                Ok(input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[test]
    fn test_keys_map_to_controls() {
        let mut input = FrameInput::default();
        input.apply(&press(KeyCode::Left));
        input.apply(&press(KeyCode::Char(' ')));
        assert!(input.controls.rotate_left && input.controls.fire);
        assert!(!input.controls.rotate_right && !input.quit);
        input.apply(&press(KeyCode::Esc));
        assert!(input.quit);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut input = FrameInput::default();
        let release = KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Release);
        input.apply(&Event::Key(release));
        assert_eq!(input, FrameInput::default());
    }

    #[test]
    fn test_pause_is_edge_triggered_per_press() {
        let mut input = FrameInput::default();
        input.apply(&press(KeyCode::Char('p')));
        assert!(input.pause_toggled);
        input.apply(&press(KeyCode::Char('p')));
        assert!(!input.pause_toggled);
    }

    #[test]
    fn test_simulated_input_replays_each_frame_once() {
        let mut events = HashMap::new();
        events.insert(2, vec![press(KeyCode::Right), press(KeyCode::Char('q'))]);
        let mut source = InputSource::Simulated(SimulatedInput::new(events));
        let budget = Duration::from_millis(16);
        assert_eq!(source.collect(1, budget).unwrap(), FrameInput::default());
        let frame = source.collect(2, budget).unwrap();
        assert!(frame.controls.rotate_right && frame.quit);
        assert_eq!(source.collect(2, budget).unwrap(), FrameInput::default());
    }
}
