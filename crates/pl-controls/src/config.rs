//! Controller configuration file format.
//!
//! A configuration describes everything needed to construct a
//! [`PidController`](crate::PidController): gains, direction, sample period,
//! output bounds and history depth. Files are YAML and are validated on load
//! and on save.

use crate::error::{ControlError, ControlResult};
use crate::history::{DEFAULT_HISTORY_CAPACITY, check_capacity};
use crate::sampled::check_sample_time;
use crate::tuning::{Direction, Gains, OutputLimits};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid controller configuration: {0}")]
    Control(#[from] ControlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Static controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub gains: Gains,
    pub direction: Direction,
    /// Minimum milliseconds between accepted compute steps.
    pub sample_time_ms: u32,
    pub output_limits: OutputLimits,
    /// Number of (input, error) samples kept for diagnostics.
    pub history_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gains: Gains::default(),
            direction: Direction::Direct,
            sample_time_ms: 100,
            output_limits: OutputLimits::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> ControlResult<()> {
        self.gains.validate()?;
        check_sample_time(self.sample_time_ms)?;
        self.output_limits.validate()?;
        check_capacity(self.history_capacity)
    }

    pub fn with_gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.gains = Gains::new(kp, ki, kd);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_sample_time_ms(mut self, sample_time_ms: u32) -> Self {
        self.sample_time_ms = sample_time_ms;
        self
    }

    pub fn with_output_limits(mut self, min: f64, max: f64) -> Self {
        self.output_limits = OutputLimits { min, max };
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: ControllerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        self.validate()?;
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn load_yaml(path: &Path) -> ConfigResult<ControllerConfig> {
    let content = std::fs::read_to_string(path)?;
    ControllerConfig::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &ControllerConfig) -> ConfigResult<()> {
    let content = config.to_yaml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
