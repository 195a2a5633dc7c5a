//! PID control primitives for pidloop.
//!
//! This crate provides the controller compute engine and everything it needs
//! to run inside a periodic control loop.
//!
//! # Architecture
//!
//! - [`PidController`] owns tuning, mode, output bounds, recurrence memory
//!   and a [`HistoryLog`]; the caller owns the loop variables ([`LoopIo`])
//!   and the clock.
//! - [`SampleGate`] rate-limits compute steps to the tuned sample period.
//! - [`RingBuffer`] is the fixed-capacity diagnostic log.
//! - [`SharedPid`] serializes access when setters and compute run on
//!   different threads.
//! - [`ControllerConfig`] is the YAML configuration format.
//!
//! # Design Principles
//!
//! - **No bump**: entering automatic continues from the current output
//! - **No kick**: derivative acts on the measurement, not the error
//! - **No windup**: the integral never leaves the output range
//! - **No partial updates**: a rejected setter leaves the controller as it was

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod sampled;
pub mod shared;
pub mod tuning;

pub use config::{ConfigError, ConfigResult, ControllerConfig, load_yaml, save_yaml};
pub use controller::{ControllerStatus, LoopIo, PidController};
pub use error::{ControlError, ControlResult};
pub use history::{
    DEFAULT_HISTORY_CAPACITY, HistoryLog, HistorySample, MAX_HISTORY_CAPACITY, RingBuffer,
};
pub use sampled::SampleGate;
pub use shared::SharedPid;
pub use tuning::{Direction, Gains, Mode, OutputLimits};
