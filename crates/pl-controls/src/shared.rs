//! Thread-safe controller handle.
//!
//! [`PidController`] itself has no locking and assumes one call site. When
//! tuning changes arrive from another thread (a UI or a command handler),
//! wrap the controller in a [`SharedPid`]: every call takes the same lock,
//! so setters can never interleave with a compute step.

use crate::controller::{ControllerStatus, LoopIo, PidController};
use crate::tuning::Mode;
use parking_lot::Mutex;
use pl_core::MonotonicClock;
use std::sync::Arc;

#[derive(Clone)]
pub struct SharedPid {
    inner: Arc<Mutex<PidController>>,
}

impl SharedPid {
    pub fn new(controller: PidController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn compute(&self, io: &mut LoopIo, clock: &impl MonotonicClock) -> bool {
        self.inner.lock().compute(io, clock)
    }

    pub fn set_mode(&self, mode: Mode, io: &LoopIo) {
        self.inner.lock().set_mode(mode, io);
    }

    /// Run `f` with exclusive access to the controller.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PidController) -> R,
    {
        let mut controller = self.inner.lock();
        f(&mut controller)
    }

    pub fn snapshot(&self) -> ControllerStatus {
        self.inner.lock().status()
    }
}
