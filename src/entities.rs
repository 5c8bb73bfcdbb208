use log::info;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::ASTEROID_RADIUS_FACTOR;
use crate::timer::{Cooldown, Interval, sanitize_dt};
use crate::types::{PlayArea, Vector2D, wrap_angle};

/// What every simulated object exposes: where it is, how big its collision circle
/// is, which way it faces, and how it advances by one frame.
pub trait Body {
    fn position(&self) -> Vector2D;
    fn radius(&self) -> f64;
    /// Facing (spaceship) or cosmetic spin (asteroid) in degrees.
    fn facing(&self) -> f64;
    fn update(&mut self, dt: f64);
}

/// Circle-circle overlap. Touching circles (distance == sum of radii) do not collide.
pub fn collides(a: &impl Body, b: &impl Body) -> bool {
    let reach = a.radius() + b.radius();
    a.position().sub(b.position()).length_squared() < reach * reach
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Spaceship,
    Earth,
    Bullet,
    Asteroid,
}

/// Everything a renderer needs to draw one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub kind: EntityKind,
    pub position: Vector2D,
    pub radius: f64,
    pub angle: f64,
}

impl EntityView {
    pub fn of(kind: EntityKind, body: &impl Body) -> Self {
        EntityView { kind, position: body.position(), radius: body.radius(), angle: body.facing() }
    }
}

/// Result of applying damage to the spaceship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged,
    LifeLost,
    /// A life was lost and the counter ran out, so it was refilled.
    LivesRestored,
}

// --- Spaceship ---
pub struct Spaceship {
    pivot: Vector2D,
    orbit_radius: f64,
    angle: f64, // Degrees, [0, 360)
    angular_velocity: f64,
    offset: Vector2D,
    radius: f64,
    health: f64,
    max_health: f64,
    lives: u32,
    starting_lives: u32,
    shoot_cooldown: Cooldown,
    bullet_speed: f64,
    bullet_radius: f64,
}

impl Spaceship {
    pub fn new(pivot: Vector2D, config: &GameConfig) -> Self {
        let angle = 0.0;
        Spaceship {
            pivot,
            orbit_radius: config.orbit_radius,
            angle,
            angular_velocity: config.spaceship_angular_velocity,
            offset: Vector2D::from_angle_degrees(angle, config.orbit_radius),
            radius: config.spaceship_radius,
            health: config.max_health,
            max_health: config.max_health,
            lives: config.starting_lives,
            starting_lives: config.starting_lives,
            shoot_cooldown: Cooldown::new(config.shoot_delay),
            bullet_speed: config.bullet_speed,
            bullet_radius: config.bullet_radius,
        }
    }

    pub fn rotate_left(&mut self, dt: f64) {
        self.angle = wrap_angle(self.angle - self.angular_velocity * sanitize_dt(dt));
    }

    pub fn rotate_right(&mut self, dt: f64) {
        self.angle = wrap_angle(self.angle + self.angular_velocity * sanitize_dt(dt));
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn pivot(&self) -> Vector2D {
        self.pivot
    }

    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    /// Vector from the pivot to the ship as of the last `update`.
    pub fn orbit_offset(&self) -> Vector2D {
        self.offset
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown.is_ready()
    }

    /// Fires along the orbit offset if the cooldown allows it.
    pub fn shoot(&mut self) -> Option<Bullet> {
        if !self.shoot_cooldown.is_ready() {
            return None;
        }
        self.shoot_cooldown.trigger();
        Some(Bullet::new(self.position(), self.offset, self.bullet_speed, self.bullet_radius))
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn apply_damage(&mut self, amount: f64) -> HitOutcome {
        self.health -= amount.max(0.0);
        if self.health > 0.0 {
            return HitOutcome::Damaged;
        }
        // No game-over state: depletion refills health and costs a life
        self.health = self.max_health;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.lives = self.starting_lives;
            info!("Spaceship ran out of lives; lives reset to {}", self.lives);
            HitOutcome::LivesRestored
        } else {
            info!("Spaceship lost a life; {} remaining", self.lives);
            HitOutcome::LifeLost
        }
    }
}

impl Body for Spaceship {
    fn position(&self) -> Vector2D {
        self.pivot.add(self.offset)
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn facing(&self) -> f64 {
        self.angle
    }

    fn update(&mut self, dt: f64) {
        self.offset = Vector2D::from_angle_degrees(self.angle, self.orbit_radius);
        self.shoot_cooldown.tick(dt);
    }
}

// --- Earth ---
pub struct Earth {
    position: Vector2D,
    radius: f64,
    health: f64,
    max_health: f64,
}

impl Earth {
    pub fn new(position: Vector2D, config: &GameConfig) -> Self {
        Earth { position, radius: config.earth_radius, health: config.max_health, max_health: config.max_health }
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    /// Returns true when the hit depleted the planet and its health was refilled.
    pub fn apply_damage(&mut self, amount: f64) -> bool {
        self.health -= amount.max(0.0);
        if self.health > 0.0 {
            return false;
        }
        self.health = self.max_health;
        info!("Earth health depleted; reset to {}", self.health);
        true
    }
}

impl Body for Earth {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn facing(&self) -> f64 {
        0.0
    }

    fn update(&mut self, _dt: f64) {}
}

// --- Bullet ---
pub struct Bullet {
    position: Vector2D,
    direction: Vector2D, // Not normalized; magnitude is the orbit radius at fire time
    speed: f64,
    radius: f64,
}

impl Bullet {
    pub fn new(position: Vector2D, direction: Vector2D, speed: f64, radius: f64) -> Self {
        Bullet { position, direction, speed, radius }
    }

    pub fn direction(&self) -> Vector2D {
        self.direction
    }

    pub fn is_within(&self, area: &PlayArea, margin: f64) -> bool {
        area.contains_with_margin(self.position, margin)
    }
}

impl Body for Bullet {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn facing(&self) -> f64 {
        self.direction.angle_degrees()
    }

    fn update(&mut self, dt: f64) {
        self.position = self.position.add(self.direction.scale(self.speed * sanitize_dt(dt)));
    }
}

// --- Asteroid ---
pub struct Asteroid {
    position: Vector2D,
    target: Vector2D,
    radial: Vector2D, // Spawn position minus target, never renormalized
    spin_angle: f64,
    angular_velocity: f64,
    spin_refresh: Interval,
    size: u32,
    radius: f64,
    speed: f64,
}

impl Asteroid {
    pub fn new(position: Vector2D, target: Vector2D, size: u32, spin_angle: f64, config: &GameConfig) -> Self {
        Asteroid {
            position,
            target,
            radial: position.sub(target),
            spin_angle: wrap_angle(spin_angle),
            angular_velocity: config.asteroid_angular_velocity,
            spin_refresh: Interval::new(config.asteroid_rotation_delay),
            size,
            radius: (size as f64 * ASTEROID_RADIUS_FACTOR).floor(),
            speed: config.asteroid_speed,
        }
    }

    /// Picks a random bearing, projects the point opposite it onto the circle that
    /// circumscribes the play area and clamps that point onto the rectangle. Spawns
    /// therefore bunch up along the edges and corners rather than spreading evenly.
    /// The bearing itself becomes the initial spin.
    pub fn spawn(area: &PlayArea, rng: &mut impl Rng, config: &GameConfig) -> Self {
        let bearing = rng.gen_range(0.0..360.0);
        let size = rng.gen_range(config.asteroid_min_size..=config.asteroid_max_size);
        let center = area.center();
        let raw = center.sub(Vector2D::from_angle_degrees(bearing, area.circumscribed_radius()));
        Asteroid::new(area.clamp(raw), center, size, bearing, config)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn radial(&self) -> Vector2D {
        self.radial
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance_to(self.target)
    }
}

impl Body for Asteroid {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn facing(&self) -> f64 {
        self.spin_angle
    }

    fn update(&mut self, dt: f64) {
        let dt = sanitize_dt(dt);
        let refreshes = self.spin_refresh.tick(dt);
        if refreshes > 0 {
            let step = self.angular_velocity * self.spin_refresh.period() * refreshes as f64;
            self.spin_angle = wrap_angle(self.spin_angle + step);
        }

        let next = self.position.sub(self.radial.scale(self.speed * dt));
        // Stop at the target instead of sailing through it
        self.position = if next.sub(self.target).dot(self.radial) <= 0.0 { self.target } else { next };
    }
}
