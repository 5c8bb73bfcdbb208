// --- Session ---
pub const PLAY_AREA_WIDTH: f64 = 640.0;
pub const PLAY_AREA_HEIGHT: f64 = 480.0;
pub const TARGET_FPS: u32 = 60;
pub const MAX_FRAME_DT: f64 = 0.25; // Seconds; longer stalls are treated as this
pub const LOG_FILE: &str = "earth-defender.log";

// --- Spaceship ---
pub const SPACESHIP_ORBIT_RADIUS: f64 = 100.0;
pub const SPACESHIP_ANGULAR_VELOCITY: f64 = 80.0; // Degrees per second
pub const SPACESHIP_RADIUS: f64 = 10.0; // 20x20 sprite
pub const SHOOT_DELAY: f64 = 0.150; // Seconds between shots
pub const MAX_HEALTH: f64 = 100.0;
pub const STARTING_LIVES: u32 = 3;

// --- Earth ---
pub const EARTH_RADIUS: f64 = 75.0; // 150x150 sprite

// --- Bullet ---
pub const BULLET_RADIUS: f64 = 2.0; // 5x5 sprite
pub const BULLET_SPEED: f64 = 2.5; // Applied to the un-normalized orbit offset, per second
pub const BULLET_BOUNDS_MARGIN: f64 = 10.0;

// --- Asteroid ---
pub const ASTEROID_MIN_SIZE: u32 = 15;
pub const ASTEROID_MAX_SIZE: u32 = 35;
pub const ASTEROID_RADIUS_FACTOR: f64 = 0.9 / 2.0; // Collision circle relative to visual size
pub const ASTEROID_SPEED: f64 = 0.15; // Fraction of the spawn offset covered per second
pub const ASTEROID_ROTATION_DELAY: f64 = 0.050; // Seconds between spin refreshes
pub const ASTEROID_ANGULAR_VELOCITY: f64 = 60.0; // Degrees per second (3 per refresh)
pub const ASTEROID_SPAWN_INTERVAL: f64 = 3.0; // Seconds
pub const MAX_SPAWNS_PER_TICK: u32 = 16; // Backlog beyond this is dropped

// --- Collisions ---
pub const DAMAGE_FACTOR: f64 = 0.5; // Health lost per unit of asteroid radius
