//! pl-core: stable foundation for pidloop.
//!
//! Contains:
//! - numeric (Real/Sample scalars + tolerances + float helpers)
//! - timing (wrapping millisecond timestamps + monotonic clocks)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use timing::{ManualClock, Millis, MonotonicClock, SystemClock};
