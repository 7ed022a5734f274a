// src/input.rs

//! Operator input and frame timing.

use crate::Number;
use serde::Serialize;

/// Two-axis stick position, each axis in `[-1, 1]`.
///
/// `x` is positive to the right. `y` follows screen coordinates: `-1` is full
/// forward (maximum throttle) and `1` is fully back (idle), which is also the
/// released position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StickInput<T> {
    x: T,
    y: T,
}

impl<T: Number> StickInput<T> {
    /// Creates a stick position, saturating both axes to `[-1, 1]`.
    ///
    /// A NaN axis reads as released: `0` for `x`, `1` for `y`.
    pub fn new(x: T, y: T) -> Self {
        let x = if x.is_nan() { T::zero() } else { x };
        let y = if y.is_nan() { T::one() } else { y };
        StickInput {
            x: x.symmetric(T::one()),
            y: y.symmetric(T::one()),
        }
    }

    /// The released stick: centred horizontally, idle throttle.
    pub fn neutral() -> Self {
        Self::new(T::zero(), T::one())
    }

    /// Stick position from a pointer offset relative to the stick centre.
    ///
    /// `travel` is the offset that corresponds to full deflection; larger
    /// offsets saturate.
    pub fn from_offset(dx: T, dy: T, travel: T) -> Self {
        Self::new(dx / travel, dy / travel)
    }

    /// Horizontal axis.
    pub fn x(&self) -> T {
        self.x
    }

    /// Vertical axis.
    pub fn y(&self) -> T {
        self.y
    }

    /// Whether either axis differs from `other` by more than `threshold`.
    pub fn moved_from(&self, other: &Self, threshold: T) -> bool {
        (self.x - other.x).abs() > threshold || (self.y - other.y).abs() > threshold
    }
}

impl<T: Number> Default for StickInput<T> {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Turns monotonic frame timestamps into bounded simulation steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock<T> {
    last: Option<T>,
    max_step: T,
}

impl<T: Number> FrameClock<T> {
    /// Creates a clock whose steps never exceed `max_step` seconds.
    pub fn new(max_step: T) -> Self {
        FrameClock {
            last: None,
            max_step,
        }
    }

    /// Step since the previous frame, in seconds, for a frame at `timestamp`
    /// seconds.
    ///
    /// The first frame yields zero. Gaps longer than the maximum step, such
    /// as a resume after a pause, are shortened to it; a clock regression
    /// yields zero.
    pub fn advance(&mut self, timestamp: T) -> T {
        let step = match self.last {
            Some(last) if timestamp.is_finite() => (timestamp - last).saturate(T::zero(), self.max_step),
            _ => T::zero(),
        };
        if timestamp.is_finite() {
            self.last = Some(timestamp);
        }
        step
    }

    /// The longest step this clock produces.
    pub fn max_step(&self) -> T {
        self.max_step
    }
}
