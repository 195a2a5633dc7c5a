//! Tuning parameters: gains, control direction, operating mode and output bounds.
//!
//! Gains exist at two scales:
//! - **display** gains are kept exactly as the user entered them,
//! - **internal** gains are normalized per tick (`ki * dt`, `kd / dt`) and
//!   carry the sign of the control direction.

use crate::error::{ControlError, ControlResult};
use pl_core::{Real, ensure_finite};
use serde::{Deserialize, Serialize};

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    /// Proportional gain.
    pub kp: Real,
    /// Integral gain (per second at display scale).
    pub ki: Real,
    /// Derivative gain (seconds at display scale).
    pub kd: Real,
}

impl Gains {
    pub fn new(kp: Real, ki: Real, kd: Real) -> Self {
        Self { kp, ki, kd }
    }

    /// Reject non-finite or negative gains.
    pub fn validate(&self) -> ControlResult<()> {
        for (which, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            ensure_finite(value, which)?;
            if value < 0.0 {
                return Err(ControlError::NegativeGain { which, value });
            }
        }
        Ok(())
    }

    /// Per-tick gains for a sample interval, signed for `direction`.
    pub(crate) fn to_internal(self, sample_time_ms: u32, direction: Direction) -> Gains {
        let dt_s = Real::from(sample_time_ms) / 1000.0;
        let scaled = Gains {
            kp: self.kp,
            ki: self.ki * dt_s,
            kd: self.kd / dt_s,
        };
        match direction {
            Direction::Direct => scaled,
            Direction::Reverse => scaled.negated(),
        }
    }

    pub(crate) fn negated(self) -> Gains {
        Gains {
            kp: -self.kp,
            ki: -self.ki,
            kd: -self.kd,
        }
    }

    /// Keep the continuous-time response when the tick length scales by `ratio`.
    pub(crate) fn rescaled(self, ratio: Real) -> Gains {
        Gains {
            kp: self.kp,
            ki: self.ki * ratio,
            kd: self.kd / ratio,
        }
    }
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            kp: 2.0,
            ki: 0.5,
            kd: 0.0,
        }
    }
}

/// Sign of the control action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Output rises when `setpoint - input` is positive (heater).
    #[default]
    Direct,
    /// Output rises when `setpoint - input` is negative (cooler).
    Reverse,
}

/// Whether the controller is computing or the output is driven by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Manual,
    Automatic,
}

/// Closed output range `[min, max]` with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputLimits {
    pub min: Real,
    pub max: Real,
}

impl OutputLimits {
    pub fn new(min: Real, max: Real) -> ControlResult<Self> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.min, "output min")?;
        ensure_finite(self.max, "output max")?;
        if self.min >= self.max {
            return Err(ControlError::InvalidOutputLimits {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn clamp(&self, value: Real) -> Real {
        value.clamp(self.min, self.max)
    }
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 255.0,
        }
    }
}
