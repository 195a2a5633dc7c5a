//! Sampled execution gate for the controller.
//!
//! The control law assumes a fixed tick length, so compute steps are only
//! accepted once at least `sample_time_ms` has passed since the previous
//! accepted step. Between accepted steps the caller keeps the last output
//! (zero-order hold).

use crate::error::{ControlError, ControlResult};
use pl_core::{Millis, Real};
use serde::{Deserialize, Serialize};

/// Minimum-interval gate over a wrapping millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleGate {
    /// Sample period in milliseconds (> 0).
    sample_time_ms: u32,
    /// Timestamp of the last accepted step.
    last_tick: Millis,
}

impl SampleGate {
    /// Create a gate that opens immediately at `now`.
    ///
    /// The last tick is back-dated by one period so the first step is not
    /// delayed.
    pub fn new(sample_time_ms: u32, now: Millis) -> ControlResult<Self> {
        check_sample_time(sample_time_ms)?;
        Ok(Self {
            sample_time_ms,
            last_tick: now.wrapping_sub(sample_time_ms),
        })
    }

    pub fn sample_time_ms(&self) -> u32 {
        self.sample_time_ms
    }

    pub fn last_tick(&self) -> Millis {
        self.last_tick
    }

    /// Returns `true` if a step is due at `now`.
    pub fn should_sample(&self, now: Millis) -> bool {
        now.wrapping_since(self.last_tick) >= self.sample_time_ms
    }

    /// Record an accepted step at `now`.
    pub fn mark(&mut self, now: Millis) {
        self.last_tick = now;
    }

    /// Change the period and return `new / old`.
    ///
    /// The last tick is kept, so the next step is due relative to the new period.
    pub fn set_sample_time(&mut self, sample_time_ms: u32) -> ControlResult<Real> {
        check_sample_time(sample_time_ms)?;
        let ratio = Real::from(sample_time_ms) / Real::from(self.sample_time_ms);
        self.sample_time_ms = sample_time_ms;
        Ok(ratio)
    }
}

pub(crate) fn check_sample_time(sample_time_ms: u32) -> ControlResult<()> {
    if sample_time_ms == 0 {
        return Err(ControlError::InvalidSampleTime { ms: sample_time_ms });
    }
    Ok(())
}
