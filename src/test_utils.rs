// src/test_utils.rs

//! This module contains utilities for testing.

use crate::Number;

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f64 = 1e-5;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` is less than
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_close<T: Number>(target: T, value: T) -> bool {
    (target - value).abs() < T::lit(TEST_TOLERANCE)
}

/// Checks if two floating point numbers are not close enough to be
/// considered equal.
pub fn value_not_close<T: Number>(target: T, value: T) -> bool {
    T::lit(TEST_TOLERANCE) <= (target - value).abs()
}

/// Checks if each component of a planar vector is close enough to
/// be considered equal.
pub fn vector_close<T: Number>(target: (T, T), value: (T, T)) -> bool {
    value_close(target.0, value.0) && value_close(target.1, value.1)
}
