//! PID compute engine.
//!
//! [`PidController`] turns (setpoint, measured input, time) into a bounded
//! output. It is meant to be polled from a single periodic call site:
//!
//! - steps are rate-gated by the sample period (see [`SampleGate`]),
//! - the integral accumulator is clamped into the output bounds (anti-windup),
//! - the derivative acts on the measured input, not the error, so setpoint
//!   steps do not kick the output,
//! - MANUAL to AUTOMATIC transfer seeds the integral from the current output,
//! - every accepted step is appended to a fixed-size [`HistoryLog`].
//!
//! The caller owns the loop variables in a [`LoopIo`] and lends it to each
//! call; the controller never keeps a reference to it.
//!
//! # Example
//!
//! ```
//! use pl_controls::{ControllerConfig, LoopIo, Mode, PidController};
//! use pl_core::{ManualClock, Millis};
//!
//! let clock = ManualClock::new(Millis(0));
//! let config = ControllerConfig::default().with_gains(2.0, 0.5, 0.0);
//! let mut pid = PidController::new(&config, Millis(0)).unwrap();
//!
//! let mut io = LoopIo { setpoint: 200, input: 150, output: 0.0 };
//! pid.set_mode(Mode::Automatic, &io);
//!
//! assert!(pid.compute(&mut io, &clock));
//! assert!(io.output > 100.0);
//!
//! // Too soon for another step.
//! clock.advance(10);
//! assert!(!pid.compute(&mut io, &clock));
//! ```

use crate::config::ControllerConfig;
use crate::error::ControlResult;
use crate::history::{HistoryLog, HistorySample};
use crate::sampled::SampleGate;
use crate::tuning::{Direction, Gains, Mode, OutputLimits};
use pl_core::{Millis, MonotonicClock, Real, Sample, SampleError, sample_error};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Loop variables owned by the caller.
///
/// `setpoint` and `input` are read on every step, `output` is overwritten
/// on every accepted step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoopIo {
    pub setpoint: Sample,
    pub input: Sample,
    pub output: Real,
}

/// Stateful PID controller.
#[derive(Debug, Clone)]
pub struct PidController {
    /// Gains as entered by the user.
    gains: Gains,
    /// Per-tick, direction-signed gains used by the recurrence.
    internal: Gains,
    direction: Direction,
    mode: Mode,
    limits: OutputLimits,
    gate: SampleGate,

    integral: Real,
    last_input: Sample,
    last_error: SampleError,

    history: HistoryLog,
}

impl PidController {
    /// Build a controller from `config`, starting in [`Mode::Manual`].
    ///
    /// `now` back-dates the sample gate by one period so the first step
    /// after switching to automatic runs without waiting.
    pub fn new(config: &ControllerConfig, now: Millis) -> ControlResult<Self> {
        config.validate()?;
        let gate = SampleGate::new(config.sample_time_ms, now)?;
        let history = HistoryLog::with_capacity(config.history_capacity)?;

        Ok(Self {
            gains: config.gains,
            internal: config
                .gains
                .to_internal(config.sample_time_ms, config.direction),
            direction: config.direction,
            mode: Mode::Manual,
            limits: config.output_limits,
            gate,
            integral: 0.0,
            last_input: 0,
            last_error: 0,
            history,
        })
    }

    /// Run one control step if the controller is automatic and a sample is due.
    ///
    /// Returns `true` when `io.output` was updated.
    pub fn compute(&mut self, io: &mut LoopIo, clock: &impl MonotonicClock) -> bool {
        self.compute_at(io, clock.now())
    }

    /// [`compute`](Self::compute) with an explicit timestamp.
    pub fn compute_at(&mut self, io: &mut LoopIo, now: Millis) -> bool {
        if self.mode == Mode::Manual {
            return false;
        }
        if !self.gate.should_sample(now) {
            return false;
        }

        let input = io.input;
        let error = sample_error(io.setpoint, input);
        let error_r = Real::from(error);

        // Anti-windup: the accumulator never leaves the output range.
        self.integral = self.limits.clamp(self.integral + self.internal.ki * error_r);

        let d_input = Real::from(SampleError::from(input) - SampleError::from(self.last_input));

        let output = self
            .limits
            .clamp(self.internal.kp * error_r + self.integral - self.internal.kd * d_input);
        io.output = output;

        self.history.push(HistorySample { input, error });
        self.last_input = input;
        self.last_error = error;
        self.gate.mark(now);

        trace!(
            t_ms = now.as_u32(),
            input,
            error,
            integral = self.integral,
            output,
            "pid step"
        );
        true
    }

    /// Switch between manual and automatic operation.
    ///
    /// Entering automatic re-seeds the recurrence from `io` so the output
    /// continues from its current value.
    pub fn set_mode(&mut self, mode: Mode, io: &LoopIo) {
        if mode == Mode::Automatic && self.mode == Mode::Manual {
            self.initialize(io);
        }
        if mode != self.mode {
            debug!(?mode, "pid mode change");
        }
        self.mode = mode;
    }

    /// Seed the integral from the current output and the derivative memory
    /// from the current input.
    pub fn initialize(&mut self, io: &LoopIo) {
        self.integral = self.limits.clamp(io.output);
        self.last_input = io.input;
    }

    /// Change control direction. No-op if unchanged.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction {
            return;
        }
        self.internal = self.internal.negated();
        self.direction = direction;
        debug!(?direction, "pid direction change");
    }

    /// Replace the gains. Negative or non-finite gains leave the controller untouched.
    pub fn set_tunings(&mut self, kp: Real, ki: Real, kd: Real) -> ControlResult<()> {
        let gains = Gains::new(kp, ki, kd);
        gains
            .validate()
            .inspect_err(|err| warn!(%err, "rejected pid tunings"))?;

        self.gains = gains;
        self.internal = gains.to_internal(self.gate.sample_time_ms(), self.direction);
        Ok(())
    }

    /// Change the sample period, rescaling the per-tick integral and derivative gains.
    pub fn set_sample_time(&mut self, sample_time_ms: u32) -> ControlResult<()> {
        let ratio = self
            .gate
            .set_sample_time(sample_time_ms)
            .inspect_err(|err| warn!(%err, "rejected pid sample time"))?;

        self.internal = self.internal.rescaled(ratio);
        Ok(())
    }

    /// Change the output range and pull the integral into it.
    ///
    /// The caller's output value is not touched until the next accepted step.
    pub fn set_output_limits(&mut self, min: Real, max: Real) -> ControlResult<()> {
        let limits = OutputLimits::new(min, max)
            .inspect_err(|err| warn!(%err, "rejected pid output limits"))?;

        self.limits = limits;
        self.integral = limits.clamp(self.integral);
        debug!(min, max, "pid output limits change");
        Ok(())
    }

    /// Proportional gain as entered.
    pub fn kp(&self) -> Real {
        self.gains.kp
    }

    /// Integral gain as entered, per second.
    pub fn ki(&self) -> Real {
        self.gains.ki
    }

    /// Derivative gain as entered, in seconds.
    pub fn kd(&self) -> Real {
        self.gains.kd
    }

    /// Display-scale gains.
    pub fn gains(&self) -> Gains {
        self.gains
    }

    /// Per-tick gains, negated when reverse acting.
    pub fn internal_gains(&self) -> Gains {
        self.internal
    }

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current control direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Active output range.
    pub fn output_limits(&self) -> OutputLimits {
        self.limits
    }

    /// Minimum interval between accepted steps.
    pub fn sample_time_ms(&self) -> u32 {
        self.gate.sample_time_ms()
    }

    /// Timestamp of the last accepted step.
    pub fn last_tick(&self) -> Millis {
        self.gate.last_tick()
    }

    /// Integral accumulator, always inside the output range.
    pub fn integral(&self) -> Real {
        self.integral
    }

    /// Input seen at the last accepted step (or at initialization).
    pub fn last_input(&self) -> Sample {
        self.last_input
    }

    /// `setpoint - input` at the last accepted step.
    pub fn last_error(&self) -> SampleError {
        self.last_error
    }

    /// Recent (input, error) samples.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Serializable snapshot for diagnostics.
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            mode: self.mode,
            direction: self.direction,
            gains: self.gains,
            internal_gains: self.internal,
            output_limits: self.limits,
            sample_time_ms: self.gate.sample_time_ms(),
            last_tick: self.gate.last_tick(),
            integral: self.integral,
            last_input: self.last_input,
            last_error: self.last_error,
            history: self.history.to_vec(),
            history_capacity: self.history.capacity(),
        }
    }
}

/// Point-in-time view of a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub mode: Mode,
    pub direction: Direction,
    pub gains: Gains,
    pub internal_gains: Gains,
    pub output_limits: OutputLimits,
    pub sample_time_ms: u32,
    pub last_tick: Millis,
    pub integral: Real,
    pub last_input: Sample,
    pub last_error: SampleError,
    /// Oldest first.
    pub history: Vec<HistorySample>,
    pub history_capacity: usize,
}
