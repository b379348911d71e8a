//! Well-formedness predicates shared by the sanity gate and the home linearizer
//!
//! All functions are pure and allocation-free, so they are safe to call
//! from any context.

use crate::errors::{SanityError, SanityResult};

/// True when every scalar is finite (not NaN, not ±∞)
pub fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// `f64` variant of [`all_finite`]
pub fn all_finite_f64(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Pass a three-axis sample through if every axis is finite
pub fn check_vector(sample: [f32; 3]) -> SanityResult<[f32; 3]> {
    if all_finite(&sample) {
        Ok(sample)
    } else {
        Err(SanityError::MalformedValue)
    }
}

/// Pass a scalar sample through if it is finite
pub fn check_scalar(sample: f32) -> SanityResult<f32> {
    if sample.is_finite() {
        Ok(sample)
    } else {
        Err(SanityError::MalformedValue)
    }
}

/// Check that `value` lies in `[min, max]`
pub fn check_range(value: f64, min: f64, max: f64) -> SanityResult<()> {
    if value < min || value > max {
        Err(SanityError::OutOfRange { value, min, max })
    } else {
        Ok(())
    }
}

/// True when `value` is within `epsilon` of zero
pub fn near_zero(value: f64, epsilon: f64) -> bool {
    libm::fabs(value) <= epsilon
}
