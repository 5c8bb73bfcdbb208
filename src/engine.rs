//! The collision/spawn engine: owns every live entity and advances the whole
//! simulation one frame at a time.
//!
//! Each [`Engine::tick`] runs, in order:
//!
//! 1. player controls (rotate, fire)
//! 2. the asteroid spawn gate, one asteroid per spawn interval crossed (at most
//!    [`MAX_SPAWNS_PER_TICK`])
//! 3. `update(dt)` on the spaceship, Earth, every bullet and every asteroid
//! 4. pruning of bullets that left the play area
//! 5. asteroid ↔ bullet hits
//! 6. asteroid ↔ spaceship hits
//! 7. asteroid ↔ Earth hits
//!
//! Pausing is the caller's business: a paused game simply stops calling `tick`.

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::constants::MAX_SPAWNS_PER_TICK;
use crate::entities::{Asteroid, Body, Bullet, Earth, EntityKind, EntityView, HitOutcome, Spaceship, collides};
use crate::timer::{Interval, sanitize_dt};
use crate::types::PlayArea;

/// Player intent for one frame. Left wins when both rotations are held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
}

/// Values shown in the health/lives bars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub spaceship_health: f64,
    pub spaceship_max_health: f64,
    pub lives: u32,
    pub earth_health: f64,
    pub earth_max_health: f64,
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub asteroids_spawned: u32,
    pub bullets_fired: u32,
    pub bullets_pruned: u32,
    pub asteroids_shot: u32,
    pub spaceship_hits: u32,
    pub earth_hits: u32,
    pub lives_lost: u32,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        *self == TickReport::default()
    }

    pub fn accumulate(&mut self, other: &TickReport) {
        self.asteroids_spawned += other.asteroids_spawned;
        self.bullets_fired += other.bullets_fired;
        self.bullets_pruned += other.bullets_pruned;
        self.asteroids_shot += other.asteroids_shot;
        self.spaceship_hits += other.spaceship_hits;
        self.earth_hits += other.earth_hits;
        self.lives_lost += other.lives_lost;
    }
}

pub struct Engine {
    config: GameConfig,
    area: PlayArea,
    spaceship: Spaceship,
    earth: Earth,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    spawn_timer: Interval,
    rng: StdRng,
}

impl Engine {
    /// Seeds from `config.seed` when present, otherwise from OS entropy.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Engine::with_rng(config, rng)
    }

    /// Builds an engine with empty bullet and asteroid populations.
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let area = config.play_area();
        let center = area.center();
        Engine {
            spaceship: Spaceship::new(center, &config),
            earth: Earth::new(center, &config),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            spawn_timer: Interval::new(config.asteroid_spawn_interval),
            area,
            config,
            rng,
        }
    }

    /// Spawns the opening asteroid and restarts the spawn cadence.
    pub fn start(&mut self) {
        self.spawn_timer.reset();
        self.spawn_asteroid();
    }

    pub fn tick(&mut self, dt: f64, controls: Controls) -> TickReport {
        let dt = sanitize_dt(dt);
        let mut report = TickReport::default();

        self.apply_controls(dt, controls, &mut report);

        let due = self.spawn_timer.tick(dt);
        if due > MAX_SPAWNS_PER_TICK {
            warn!("{} asteroid spawns due in one tick, capping at {}", due, MAX_SPAWNS_PER_TICK);
        }
        for _ in 0..due.min(MAX_SPAWNS_PER_TICK) {
            self.spawn_asteroid();
            report.asteroids_spawned += 1;
        }

        self.spaceship.update(dt);
        self.earth.update(dt);
        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        for asteroid in &mut self.asteroids {
            asteroid.update(dt);
        }

        report.bullets_pruned = self.prune_bullets();
        report.asteroids_shot = self.resolve_bullet_hits();
        let (spaceship_hits, lives_lost) = self.resolve_spaceship_hits();
        report.spaceship_hits = spaceship_hits;
        report.lives_lost = lives_lost;
        report.earth_hits = self.resolve_earth_hits();
        report
    }

    fn apply_controls(&mut self, dt: f64, controls: Controls, report: &mut TickReport) {
        if controls.rotate_left {
            self.spaceship.rotate_left(dt);
        } else if controls.rotate_right {
            self.spaceship.rotate_right(dt);
        }
        if controls.fire {
            if let Some(bullet) = self.spaceship.shoot() {
                self.bullets.push(bullet);
                report.bullets_fired += 1;
            }
        }
    }

    pub fn spawn_asteroid(&mut self) {
        let asteroid = Asteroid::spawn(&self.area, &mut self.rng, &self.config);
        debug!(
            "Spawned asteroid at ({:.1}, {:.1}) with radius {}",
            asteroid.position().x,
            asteroid.position().y,
            asteroid.radius()
        );
        self.asteroids.push(asteroid);
    }

    pub fn add_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    /// Drops bullets whose centre left the play area plus the bounds margin.
    pub fn prune_bullets(&mut self) -> u32 {
        let before = self.bullets.len();
        let area = self.area;
        let margin = self.config.bullet_bounds_margin;
        self.bullets.retain(|bullet| bullet.is_within(&area, margin));
        let pruned = (before - self.bullets.len()) as u32;
        if pruned > 0 {
            debug!("Pruned {} bullet(s) outside the play area", pruned);
        }
        pruned
    }

    /// Removes every overlapping asteroid/bullet pair. A bullet is consumed by the
    /// first asteroid it overlaps; an asteroid takes every bullet overlapping it.
    /// Returns the number of asteroids destroyed.
    pub fn resolve_bullet_hits(&mut self) -> u32 {
        let mut consumed = vec![false; self.bullets.len()];
        let before = self.asteroids.len();
        let bullets = &self.bullets;
        self.asteroids.retain(|asteroid| {
            let mut hit = false;
            for (index, bullet) in bullets.iter().enumerate() {
                if !consumed[index] && collides(asteroid, bullet) {
                    consumed[index] = true;
                    hit = true;
                }
            }
            !hit
        });

        let mut index = 0;
        self.bullets.retain(|_| {
            let keep = !consumed[index];
            index += 1;
            keep
        });
        (before - self.asteroids.len()) as u32
    }

    /// Returns (asteroids that struck the spaceship, lives lost).
    pub fn resolve_spaceship_hits(&mut self) -> (u32, u32) {
        let damage_factor = self.config.damage_factor;
        let spaceship = &mut self.spaceship;
        let mut hits = 0;
        let mut lives_lost = 0;
        self.asteroids.retain(|asteroid| {
            if !collides(asteroid, &*spaceship) {
                return true;
            }
            hits += 1;
            match spaceship.apply_damage(asteroid.radius() * damage_factor) {
                HitOutcome::Damaged => {}
                HitOutcome::LifeLost | HitOutcome::LivesRestored => lives_lost += 1,
            }
            false
        });
        (hits, lives_lost)
    }

    /// Returns the number of asteroids that struck Earth.
    pub fn resolve_earth_hits(&mut self) -> u32 {
        let damage_factor = self.config.damage_factor;
        let earth = &mut self.earth;
        let mut hits = 0;
        self.asteroids.retain(|asteroid| {
            if !collides(asteroid, &*earth) {
                return true;
            }
            hits += 1;
            earth.apply_damage(asteroid.radius() * damage_factor);
            false
        });
        hits
    }

    /// Render snapshot, back to front: Earth, asteroids, bullets, spaceship.
    pub fn views(&self) -> Vec<EntityView> {
        let mut views = Vec::with_capacity(2 + self.asteroids.len() + self.bullets.len());
        views.push(EntityView::of(EntityKind::Earth, &self.earth));
        views.extend(self.asteroids.iter().map(|a| EntityView::of(EntityKind::Asteroid, a)));
        views.extend(self.bullets.iter().map(|b| EntityView::of(EntityKind::Bullet, b)));
        views.push(EntityView::of(EntityKind::Spaceship, &self.spaceship));
        views
    }

    pub fn hud(&self) -> Hud {
        Hud {
            spaceship_health: self.spaceship.health(),
            spaceship_max_health: self.spaceship.max_health(),
            lives: self.spaceship.lives(),
            earth_health: self.earth.health(),
            earth_max_health: self.earth.max_health(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn play_area(&self) -> PlayArea {
        self.area
    }

    pub fn spaceship(&self) -> &Spaceship {
        &self.spaceship
    }

    pub fn spaceship_mut(&mut self) -> &mut Spaceship {
        &mut self.spaceship
    }

    pub fn earth(&self) -> &Earth {
        &self.earth
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }
}
