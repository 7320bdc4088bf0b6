//! Engine configuration: animation timings and card spawn placement.
//!
//! Defaults match [`crate::consts`]. Hosts may override them through
//! `MOTOPRINT_*` environment variables via [`DeskConfig::from_env`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::consts::{
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, ENTER_SETTLE_MS, EXIT_ANIMATION_MS, MAX_ROTATION_DEG,
    SPAWN_JITTER_PX, TYPE_INTERVAL_MS, TYPE_START_DELAY_MS,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
    #[error("typewriter interval must be greater than zero")]
    ZeroTypeInterval,
    #[error("viewport must be finite and non-negative, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidSpread { field: &'static str, value: f64 },
}

/// Fixed delays driving the card animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Creation to `entering → idle`.
    pub enter_settle: Duration,
    /// `exiting` to removal.
    pub exit_animation: Duration,
    /// Creation to the first revealed character.
    pub type_start_delay: Duration,
    /// Between revealed characters.
    pub type_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            enter_settle: Duration::from_millis(ENTER_SETTLE_MS),
            exit_animation: Duration::from_millis(EXIT_ANIMATION_MS),
            type_start_delay: Duration::from_millis(TYPE_START_DELAY_MS),
            type_interval: Duration::from_millis(TYPE_INTERVAL_MS),
        }
    }
}

/// Where new cards appear and how much they vary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Half-width of the uniform position jitter, in pixels.
    pub jitter: f64,
    /// Half-width of the uniform rotation range, in degrees.
    pub max_rotation: f64,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            jitter: SPAWN_JITTER_PX,
            max_rotation: MAX_ROTATION_DEG,
            seed: None,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeskConfig {
    pub timings: Timings,
    pub spawn: SpawnConfig,
    /// Seed the desk with the welcome card on construction.
    pub welcome_card: bool,
}

impl DeskConfig {
    /// Same config with a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.spawn.seed = Some(seed);
        self
    }

    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `MOTOPRINT_ENTER_SETTLE_MS`: default 50
    /// - `MOTOPRINT_EXIT_ANIMATION_MS`: default 300
    /// - `MOTOPRINT_TYPE_START_DELAY_MS`: default 400
    /// - `MOTOPRINT_TYPE_INTERVAL_MS`: default 50
    /// - `MOTOPRINT_VIEWPORT_WIDTH` / `MOTOPRINT_VIEWPORT_HEIGHT`: default 1280x800
    /// - `MOTOPRINT_SPAWN_JITTER`: default 20
    /// - `MOTOPRINT_MAX_ROTATION`: default 3
    /// - `MOTOPRINT_SEED`: unset seeds from the OS
    /// - `MOTOPRINT_WELCOME`: `true` / `false`, default false
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparsable values and the
    /// [`DeskConfig::validate`] errors for out-of-range ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`DeskConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ms = |key: &str, default: Duration| -> Result<Duration, ConfigError> {
            Ok(parse_var::<u64, _>(&lookup, key)?.map_or(default, Duration::from_millis))
        };
        let float = |key: &str, default: f64| -> Result<f64, ConfigError> {
            Ok(parse_var::<f64, _>(&lookup, key)?.unwrap_or(default))
        };

        let timings = Timings {
            enter_settle: ms("MOTOPRINT_ENTER_SETTLE_MS", defaults.timings.enter_settle)?,
            exit_animation: ms("MOTOPRINT_EXIT_ANIMATION_MS", defaults.timings.exit_animation)?,
            type_start_delay: ms("MOTOPRINT_TYPE_START_DELAY_MS", defaults.timings.type_start_delay)?,
            type_interval: ms("MOTOPRINT_TYPE_INTERVAL_MS", defaults.timings.type_interval)?,
        };
        let spawn = SpawnConfig {
            viewport_width: float("MOTOPRINT_VIEWPORT_WIDTH", defaults.spawn.viewport_width)?,
            viewport_height: float("MOTOPRINT_VIEWPORT_HEIGHT", defaults.spawn.viewport_height)?,
            jitter: float("MOTOPRINT_SPAWN_JITTER", defaults.spawn.jitter)?,
            max_rotation: float("MOTOPRINT_MAX_ROTATION", defaults.spawn.max_rotation)?,
            seed: parse_var::<u64, _>(&lookup, "MOTOPRINT_SEED")?,
        };
        let welcome_card = parse_var::<bool, _>(&lookup, "MOTOPRINT_WELCOME")?.unwrap_or(defaults.welcome_card);

        let config = Self { timings, spawn, welcome_card };
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero typewriter interval, a non-finite or
    /// negative viewport, or a non-finite or negative jitter or rotation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timings.type_interval.is_zero() {
            return Err(ConfigError::ZeroTypeInterval);
        }
        let (width, height) = (self.spawn.viewport_width, self.spawn.viewport_height);
        if !is_non_negative(width) || !is_non_negative(height) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        if !is_non_negative(self.spawn.jitter) {
            return Err(ConfigError::InvalidSpread { field: "jitter", value: self.spawn.jitter });
        }
        if !is_non_negative(self.spawn.max_rotation) {
            return Err(ConfigError::InvalidSpread { field: "max_rotation", value: self.spawn.max_rotation });
        }
        Ok(())
    }
}

pub(crate) fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn env_lookup(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { var: key.to_owned(), value: raw.clone() })
}
