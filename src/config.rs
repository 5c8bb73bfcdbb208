//! Runtime configuration loaded from an optional TOML file.
//!
//! Every field defaults to its compile-time constant in [`crate::constants`], so a
//! config file only needs the keys it wants to override:
//!
//! ```toml
//! fps = 30
//! asteroid_spawn_interval = 1.5
//! seed = 42
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

use crate::constants::*;
use crate::error::{GameError, Result};
use crate::types::PlayArea;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    // ── Session ──────────────────────────────────────────────────────────────
    pub play_width: f64,
    pub play_height: f64,
    pub fps: u32,
    pub max_frame_dt: f64,
    pub seed: Option<u64>,
    pub log_level: String,

    // ── Spaceship ────────────────────────────────────────────────────────────
    pub orbit_radius: f64,
    pub spaceship_angular_velocity: f64,
    pub spaceship_radius: f64,
    pub shoot_delay: f64,
    pub max_health: f64,
    pub starting_lives: u32,

    // ── Earth ────────────────────────────────────────────────────────────────
    pub earth_radius: f64,

    // ── Bullet ───────────────────────────────────────────────────────────────
    pub bullet_radius: f64,
    pub bullet_speed: f64,
    pub bullet_bounds_margin: f64,

    // ── Asteroid ─────────────────────────────────────────────────────────────
    pub asteroid_min_size: u32,
    pub asteroid_max_size: u32,
    pub asteroid_speed: f64,
    pub asteroid_rotation_delay: f64,
    pub asteroid_angular_velocity: f64,
    pub asteroid_spawn_interval: f64,

    // ── Collisions ───────────────────────────────────────────────────────────
    pub damage_factor: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_width: PLAY_AREA_WIDTH,
            play_height: PLAY_AREA_HEIGHT,
            fps: TARGET_FPS,
            max_frame_dt: MAX_FRAME_DT,
            seed: None,
            log_level: "info".to_string(),
            orbit_radius: SPACESHIP_ORBIT_RADIUS,
            spaceship_angular_velocity: SPACESHIP_ANGULAR_VELOCITY,
            spaceship_radius: SPACESHIP_RADIUS,
            shoot_delay: SHOOT_DELAY,
            max_health: MAX_HEALTH,
            starting_lives: STARTING_LIVES,
            earth_radius: EARTH_RADIUS,
            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            bullet_bounds_margin: BULLET_BOUNDS_MARGIN,
            asteroid_min_size: ASTEROID_MIN_SIZE,
            asteroid_max_size: ASTEROID_MAX_SIZE,
            asteroid_speed: ASTEROID_SPEED,
            asteroid_rotation_delay: ASTEROID_ROTATION_DELAY,
            asteroid_angular_velocity: ASTEROID_ANGULAR_VELOCITY,
            asteroid_spawn_interval: ASTEROID_SPAWN_INTERVAL,
            damage_factor: DAMAGE_FACTOR,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, path.to_path_buf())
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Self::parse(source, PathBuf::from("<inline>"))
    }

    fn parse(source: &str, path: PathBuf) -> Result<Self> {
        let config: GameConfig =
            toml::from_str(source).map_err(|source| GameError::ConfigParse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with. Called by the loaders; call it
    /// again after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("play_width", self.play_width),
            ("play_height", self.play_height),
            ("max_frame_dt", self.max_frame_dt),
            ("orbit_radius", self.orbit_radius),
            ("spaceship_radius", self.spaceship_radius),
            ("shoot_delay", self.shoot_delay),
            ("max_health", self.max_health),
            ("earth_radius", self.earth_radius),
            ("bullet_radius", self.bullet_radius),
            ("asteroid_rotation_delay", self.asteroid_rotation_delay),
            ("asteroid_spawn_interval", self.asteroid_spawn_interval),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig { field: "fps", reason: "must be at least 1".to_string() });
        }
        if self.starting_lives == 0 {
            return Err(GameError::InvalidConfig {
                field: "starting_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.asteroid_min_size == 0 || self.asteroid_min_size > self.asteroid_max_size {
            return Err(GameError::InvalidConfig {
                field: "asteroid_min_size",
                reason: format!(
                    "must be in 1..={} (asteroid_max_size), got {}",
                    self.asteroid_max_size, self.asteroid_min_size
                ),
            });
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn play_area(&self) -> PlayArea {
        PlayArea::new(self.play_width, self.play_height)
    }

    /// Fixed step used by headless runs and as the loop's frame budget.
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.fps as f64
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| GameError::InvalidConfig {
            field: "log_level",
            reason: format!("unknown level `{}`", self.log_level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = GameConfig::default();
        assert_eq!(config.play_area(), PlayArea::new(640.0, 480.0));
        assert_eq!(config.shoot_delay, SHOOT_DELAY);
        assert_eq!(config.asteroid_spawn_interval, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_only_given_keys() {
        let config = GameConfig::from_toml_str("fps = 30\nseed = 7\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.orbit_radius, SPACESHIP_ORBIT_RADIUS);
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = GameConfig::from_toml_str("warp_speed = 9").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = GameConfig::from_toml_str("earth_radius = -1.0").unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig { field: "earth_radius", .. }));

        let err = GameConfig::from_toml_str("asteroid_min_size = 40").unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig { field: "asteroid_min_size", .. }));

        let err = GameConfig::from_toml_str("log_level = \"loud\"").unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig { field: "log_level", .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = GameConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
