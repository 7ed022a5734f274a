// src/cascade/altitude.rs

//! # Altitude Cascade
//!
//! Without altitude stabilization the vertical stick axis maps linearly onto
//! throttle. With it, the stick selects a target altitude within the arena,
//! the outer loop turns the altitude error into a vertical speed set point
//! and the inner loop turns the vertical speed error into throttle.

use crate::pid::TimedPid;
use crate::{ControlLimits, ControllerGains, FlightFeedback, Number, Setpoints, StabilizationModes};

/// Altitude and vertical rate loops.
pub struct AltitudeCascade<T: Number> {
    altitude_pid: TimedPid<T>,
    vertical_rate_pid: TimedPid<T>,
}

/// Throttle for a raw vertical stick deflection: `-1` is full, `1` is idle.
pub fn raw_throttle<T: Number>(stick_y: T) -> T {
    (T::one() - stick_y) / (T::one() + T::one())
}

impl<T: Number> AltitudeCascade<T> {
    /// Creates both loops from the controller gains.
    pub fn with_gains(gains: &ControllerGains<T>) -> Self {
        AltitudeCascade {
            altitude_pid: TimedPid::new(gains.altitude),
            vertical_rate_pid: TimedPid::new(gains.vertical_rate),
        }
    }

    /// Computes the throttle for `stick_y` in `[-1, 1]`.
    ///
    /// `arena_height` is the altitude selected by full upward deflection.
    /// Updates `setpoints.altitude` and `setpoints.vertical_speed` when
    /// altitude stabilization is on.
    pub fn control<F: FlightFeedback<T>>(
        &mut self,
        stick_y: T,
        modes: StabilizationModes,
        limits: &ControlLimits<T>,
        arena_height: T,
        feedback: &F,
        now: T,
        setpoints: &mut Setpoints<T>,
    ) -> T {
        if !modes.altitude() {
            return raw_throttle(stick_y);
        }

        setpoints.altitude = raw_throttle(stick_y) * arena_height;
        setpoints.vertical_speed = self
            .altitude_pid
            .update(setpoints.altitude, feedback.altitude(arena_height), now)
            .symmetric(limits.max_vertical_speed);

        self.vertical_rate_pid
            .update(setpoints.vertical_speed, feedback.climb_rate(), now)
            .unit()
    }

    /// The altitude loop.
    pub fn altitude_pid(&self) -> &TimedPid<T> {
        &self.altitude_pid
    }

    /// The vertical rate loop.
    pub fn vertical_rate_pid(&self) -> &TimedPid<T> {
        &self.vertical_rate_pid
    }

    /// Clears the history of both loops.
    pub fn reset(&mut self) {
        self.altitude_pid.reset();
        self.vertical_rate_pid.reset();
    }
}
