//! Monotonic millisecond time for control loops.
//!
//! Firmware tick counters are 32-bit and wrap roughly every 49.7 days.
//! [`Millis`] keeps that representation and only ever compares timestamps
//! through wrapping subtraction, so an elapsed-time check stays correct
//! across the wrap as long as the real gap is below `u32::MAX` ms.

use core::cell::Cell;
use core::fmt;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wrapping millisecond timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub fn new(ms: u32) -> Self {
        Self(ms)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, modulo 2^32.
    #[inline]
    pub fn wrapping_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    #[inline]
    pub fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }

    #[inline]
    pub fn wrapping_sub(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_sub(ms))
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Millis({})", self.0)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<u32> for Millis {
    fn from(ms: u32) -> Self {
        Self(ms)
    }
}

/// Source of monotonic time for the controller.
pub trait MonotonicClock {
    /// Current tick count.
    fn now(&self) -> Millis;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// Wall-independent clock backed by [`Instant`].
///
/// Counts from construction and truncates to 32 bits like a hardware tick.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_millis() as u32)
    }
}

/// Clock advanced explicitly by the caller.
///
/// Used by simulations and tests where time must be deterministic.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    pub fn set(&self, t: Millis) {
        self.now.set(t.0);
    }

    /// Move the clock forward by `ms`, wrapping like a tick counter.
    pub fn advance(&self, ms: u32) -> Millis {
        let next = self.now.get().wrapping_add(ms);
        self.now.set(next);
        Millis(next)
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}
