//! Error types for controller configuration.

use pl_core::CoreError;
use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Rejected controller configuration.
///
/// A setter that returns one of these has left the controller untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A tuning gain was below zero.
    #[error("Negative gain: {which} = {value}")]
    NegativeGain { which: &'static str, value: f64 },

    /// A tuning gain or output bound was NaN or infinite.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Sample interval must be at least one millisecond.
    #[error("Invalid sample time: {ms} ms (must be > 0)")]
    InvalidSampleTime { ms: u32 },

    /// Output bounds must satisfy `min < max`.
    #[error("Invalid output limits: min {min} must be less than max {max}")]
    InvalidOutputLimits { min: f64, max: f64 },

    /// History log capacity must be non-zero.
    #[error("History capacity must be greater than zero")]
    ZeroCapacity,

    /// History log capacity above [`MAX_HISTORY_CAPACITY`](crate::MAX_HISTORY_CAPACITY).
    #[error("History capacity {requested} exceeds the maximum of {max}")]
    CapacityTooLarge { requested: usize, max: usize },
}

impl From<CoreError> for ControlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, value } => Self::NonFinite { what, value },
        }
    }
}
