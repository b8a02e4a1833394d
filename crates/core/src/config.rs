//! Tracker configuration and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sample::STANDARD_GRAVITY;

/// Errors that can occur while building or loading a tracker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Goal must be a positive, finite number of seconds
    #[error("goal_seconds must be positive and finite, got {0}")]
    InvalidGoal(f64),

    /// Threshold must be a positive, finite magnitude
    #[error("movement_threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),

    /// Tick interval must be a positive, finite number of seconds
    #[error("tick_interval_seconds must be positive and finite, got {0}")]
    InvalidTickInterval(f64),

    /// Rest magnitude must be finite and non-negative
    #[error("rest_magnitude must be finite and non-negative, got {0}")]
    InvalidRestMagnitude(f64),

    /// I/O error while reading a config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable settings for one stillness challenge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Continuous stillness required to finish, in seconds
    pub goal_seconds: f64,

    /// Deviation from rest magnitude at or above which a sample counts as movement
    pub movement_threshold: f64,

    /// Seconds credited per still tick
    pub tick_interval_seconds: f64,

    /// Expected magnitude of a motionless device (9.81 raw, 1.0 if normalised to g)
    pub rest_magnitude: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            goal_seconds: 15.0,
            movement_threshold: 0.7,
            tick_interval_seconds: 1.0,
            rest_magnitude: STANDARD_GRAVITY,
        }
    }
}

impl TrackerConfig {
    /// Create a config with the given goal and threshold, other fields default.
    pub fn new(goal_seconds: f64, movement_threshold: f64) -> Self {
        Self {
            goal_seconds,
            movement_threshold,
            ..Self::default()
        }
    }

    /// Set the goal duration.
    pub fn with_goal_seconds(mut self, goal_seconds: f64) -> Self {
        self.goal_seconds = goal_seconds;
        self
    }

    /// Set the movement threshold.
    pub fn with_movement_threshold(mut self, threshold: f64) -> Self {
        self.movement_threshold = threshold;
        self
    }

    /// Set the tick interval.
    pub fn with_tick_interval(mut self, seconds: f64) -> Self {
        self.tick_interval_seconds = seconds;
        self
    }

    /// Set the rest magnitude.
    pub fn with_rest_magnitude(mut self, magnitude: f64) -> Self {
        self.rest_magnitude = magnitude;
        self
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.goal_seconds.is_finite() && self.goal_seconds > 0.0) {
            return Err(ConfigError::InvalidGoal(self.goal_seconds));
        }
        if !(self.movement_threshold.is_finite() && self.movement_threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(self.movement_threshold));
        }
        if !(self.tick_interval_seconds.is_finite() && self.tick_interval_seconds > 0.0) {
            return Err(ConfigError::InvalidTickInterval(self.tick_interval_seconds));
        }
        if !(self.rest_magnitude.is_finite() && self.rest_magnitude >= 0.0) {
            return Err(ConfigError::InvalidRestMagnitude(self.rest_magnitude));
        }
        Ok(())
    }

    /// Tick interval as a [`std::time::Duration`].
    ///
    /// Only meaningful on a validated config.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.tick_interval_seconds)
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
