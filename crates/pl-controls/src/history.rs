//! Fixed-capacity circular history of recent controller samples.
//!
//! The buffer is allocated once at construction and never grows. Once full,
//! each push overwrites the oldest entry, so the most recent
//! `min(len, capacity)` samples are always available.

use crate::error::{ControlError, ControlResult};
use pl_core::{Sample, SampleError};
use serde::{Deserialize, Serialize};

/// Default capacity: a 20 s window at 100 ms sampling.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20_000 / 100;

/// Largest accepted capacity: about 109 minutes at 100 ms sampling.
pub const MAX_HISTORY_CAPACITY: usize = 1 << 16;

/// One accepted compute step as recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorySample {
    /// Measured input at the step.
    pub input: Sample,
    /// `setpoint - input` at the step.
    pub error: SampleError,
}

/// History log kept by the controller.
pub type HistoryLog = RingBuffer<HistorySample>;

/// Ring buffer with explicit capacity, write cursor and logical size.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    slots: Box<[T]>,
    write_cursor: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    pub fn with_capacity(capacity: usize) -> ControlResult<Self> {
        check_capacity(capacity)?;
        Ok(Self {
            slots: vec![T::default(); capacity].into_boxed_slice(),
            write_cursor: 0,
            len: 0,
        })
    }

    /// Append `item`, overwriting the oldest entry when full.
    pub fn push(&mut self, item: T) {
        self.slots[self.write_cursor] = item;
        self.write_cursor = (self.write_cursor + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    /// Most recently pushed item.
    pub fn latest(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let cap = self.slots.len();
        Some(self.slots[(self.write_cursor + cap - 1) % cap])
    }

    /// Items from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
        let cap = self.slots.len();
        let start = (self.write_cursor + cap - self.len) % cap;
        (0..self.len).map(move |i| self.slots[(start + i) % cap])
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

}

impl<T> RingBuffer<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Slot the next push will write.
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Backing storage in slot order, for direct inspection by diagnostics.
    ///
    /// Slots at or past `len()` are unwritten until the buffer first fills.
    pub fn raw(&self) -> &[T] {
        &self.slots
    }
}

pub(crate) fn check_capacity(capacity: usize) -> ControlResult<()> {
    if capacity == 0 {
        return Err(ControlError::ZeroCapacity);
    }
    if capacity > MAX_HISTORY_CAPACITY {
        return Err(ControlError::CapacityTooLarge {
            requested: capacity,
            max: MAX_HISTORY_CAPACITY,
        });
    }
    Ok(())
}
