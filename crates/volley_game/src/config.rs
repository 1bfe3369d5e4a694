//! Simulation configuration.

use serde::Deserialize;

/// Errors raised while loading a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f64),
}

/// Configuration for the fixed-timestep frame loop.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a non-positive or non-finite tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate.is_finite() && self.tick_rate > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidTickRate(self.tick_rate))
        }
    }

    /// Override the tick rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Override the tick limit.
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Seconds of simulated time per tick.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        (1.0 / self.tick_rate) as f32
    }
}
