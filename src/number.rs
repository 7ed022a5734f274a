// src/number.rs

//! Numeric abstraction shared by the controllers and the rigid body model.
//!
//! Everything in this crate is generic over [`Number`], so the same code runs
//! on `f32` and `f64`. The bound combines the requirements of
//! [`piddiy::PidController`] with the trigonometry the integrator needs.

use num_traits::{Float, FloatConst, NumCast};
use piddiy::Number as PiddiyNumber;

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber + Float + FloatConst {
    /// Converts an `f64` constant into `Self`.
    ///
    /// Values that cannot be represented become NaN rather than panicking.
    fn lit(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }

    /// Saturates `self` to the closed range `[min, max]`.
    fn saturate(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }

    /// Saturates `self` to `[0, 1]`. NaN maps to zero.
    fn unit(self) -> Self {
        if self.is_nan() {
            return Self::zero();
        }
        self.saturate(Self::zero(), Self::one())
    }

    /// Saturates `self` to `[-limit, limit]`.
    fn symmetric(self, limit: Self) -> Self {
        self.saturate(-limit, limit)
    }
}

impl<T: PiddiyNumber + Float + FloatConst> Number for T {}

/// Wraps an angle in radians into the half-open range `(-π, π]`.
pub fn wrap_angle<T: Number>(angle: T) -> T {
    let pi = T::PI();
    let tau = pi + pi;
    let mut wrapped = angle - tau * ((angle + pi) / tau).floor();
    if wrapped <= -pi {
        wrapped = wrapped + tau;
    } else if wrapped > pi {
        wrapped = wrapped - tau;
    }
    wrapped
}
