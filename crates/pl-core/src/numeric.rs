use crate::CoreError;

/// Floating point type used for gains, output and the integral accumulator
pub type Real = f64;

/// Sensor-scale value (setpoint and measured input), as read from the ADC path
pub type Sample = i16;

/// Signed control error on the sensor scale.
///
/// Wider than [`Sample`] so `setpoint - input` cannot overflow.
pub type SampleError = i32;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `setpoint - input`, widened.
#[inline]
pub fn sample_error(setpoint: Sample, input: Sample) -> SampleError {
    SampleError::from(setpoint) - SampleError::from(input)
}
