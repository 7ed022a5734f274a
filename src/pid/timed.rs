// src/pid/timed.rs

//! # Timestamped PID Control Module
//!
//! This module provides a compute function and control data structure for
//! PID loops that derive their time step from the timestamps of consecutive
//! updates instead of receiving it from the caller.
//!
//! A [`TimedPid`] stays silent on its first update (there is no previous
//! timestamp to measure `dt` against) and ignores updates whose `dt` is not a
//! finite positive number, which keeps the derivative term free of division by
//! zero when two updates land on the same timestamp or the clock regresses.

use crate::Number;
use piddiy::PidController;
use serde::{Deserialize, Serialize};

/// Proportional, integral and derivative gains of one loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains<T> {
    /// Proportional gain.
    pub kp: T,
    /// Integral gain.
    pub ki: T,
    /// Derivative gain.
    pub kd: T,
}

impl<T: Number> PidGains<T> {
    /// Creates a gain triple.
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        Self { kp, ki, kd }
    }

    /// Pure proportional gains.
    pub fn proportional(kp: T) -> Self {
        Self::new(kp, T::zero(), T::zero())
    }
}

/// Control data for the timestamped PID compute callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimedControlData<T> {
    /// The measured value of the controlled quantity.
    pub feedback: T,
    /// Time elapsed since the previous accepted update.
    pub dt: T,
}

/// Timestamped PID compute callback.
///
/// Returns `(error, integral, derivative)`; the integral is not saturated.
pub fn compute_timed<T: Number>(
    pid: &mut PidController<T, TimedControlData<T>>,
    data: TimedControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.feedback;
    let integral = pid.integral + error * data.dt;
    let derivative = (error - pid.error) / data.dt;

    (error, integral, derivative)
}

/// PID controller that measures its own time step between updates.
pub struct TimedPid<T: Number> {
    pid: PidController<T, TimedControlData<T>>,
    gains: PidGains<T>,
    last_update: Option<T>,
}

impl<T: Number> TimedPid<T> {
    /// Creates a controller with the given gains and no history.
    pub fn new(gains: PidGains<T>) -> Self {
        let mut pid = PidController::new();
        pid.compute_fn(compute_timed)
            .set_point(T::zero())
            .kp(gains.kp)
            .ki(gains.ki)
            .kd(gains.kd);

        TimedPid {
            pid,
            gains,
            last_update: None,
        }
    }

    /// Runs one update at timestamp `now` (seconds) and returns the output.
    ///
    /// The first update after construction or [`reset`](Self::reset) only
    /// records `now` and returns zero. An update whose elapsed time is not a
    /// finite positive number returns zero and leaves the controller untouched.
    pub fn update(&mut self, set_point: T, feedback: T, now: T) -> T {
        let Some(last) = self.last_update else {
            self.last_update = Some(now);
            return T::zero();
        };

        let dt = now - last;
        if !(dt > T::zero()) || !dt.is_finite() {
            return T::zero();
        }
        self.last_update = Some(now);

        self.pid.set_point(set_point);
        self.pid.compute(TimedControlData { feedback, dt })
    }

    /// Clears the integral, the last error and the timestamp.
    pub fn reset(&mut self) {
        *self = Self::new(self.gains);
    }

    /// The gains this controller was built with.
    pub fn gains(&self) -> PidGains<T> {
        self.gains
    }

    /// The accumulated integral term.
    pub fn integral(&self) -> T {
        self.pid.integral
    }

    /// The error seen by the last accepted update.
    pub fn last_error(&self) -> T {
        self.pid.error
    }

    /// Timestamp of the last accepted update, if any.
    pub fn last_update(&self) -> Option<T> {
        self.last_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn primed(gains: PidGains<f32>) -> TimedPid<f32> {
        let mut pid = TimedPid::new(gains);
        let _ = pid.update(0.0, 0.0, 0.0);
        pid
    }

    /// Test that the first update only records the timestamp.
    #[test]
    fn test_pid_timed_first_update_is_silent() {
        let mut pid = TimedPid::new(PidGains::new(1.0_f32, 1.0, 1.0));
        let output = pid.update(10.0, 0.0, 3.0);

        assert!(value_close(0.0, output), "First update should return zero.");
        assert_eq!(pid.last_update(), Some(3.0));
        assert!(value_close(0.0, pid.integral()), "Integral should be untouched.");
        assert!(value_close(0.0, pid.last_error()), "Error should be untouched.");
    }

    /// Test PID response with non-zero set point and zero feedback.
    #[test]
    fn test_pid_timed_response() {
        let mut pid = primed(PidGains::new(1.0, 1.0, 1.0));

        let output = pid.update(10.0, 0.0, 1.0);
        assert!(value_close(10.0, pid.last_error()), "Error should be 10.");
        assert!(value_close(10.0, pid.integral()), "Integral should start to accumulate.");
        assert!(value_close(30.0, output), "Output should be the sum of terms.");

        let output = pid.update(10.0, 0.0, 2.0);
        assert!(value_close(20.0, pid.integral()), "Integral should accumulate to 20.");
        assert!(value_close(30.0, output), "Derivative should vanish at constant error.");
    }

    /// Test the elapsed time is measured between updates.
    #[test]
    fn test_pid_timed_uses_timestamp_delta() {
        let mut pid = primed(PidGains::new(0.0, 1.0, 0.0));

        let output = pid.update(2.0, 0.0, 0.5);
        assert!(value_close(1.0, output), "Integral should be error * 0.5.");

        let output = pid.update(2.0, 0.0, 0.75);
        assert!(value_close(1.5, output), "Integral should grow by error * 0.25.");
    }

    /// Test that repeated or regressing timestamps are ignored.
    #[test]
    fn test_pid_timed_rejects_non_positive_dt() {
        let mut pid = primed(PidGains::new(1.0, 1.0, 1.0));
        let _ = pid.update(4.0, 1.0, 1.0);
        let integral = pid.integral();
        let error = pid.last_error();

        let same = pid.update(100.0, 0.0, 1.0);
        let earlier = pid.update(100.0, 0.0, 0.5);
        let nan = pid.update(100.0, 0.0, f32::NAN);

        assert!(value_close(0.0, same));
        assert!(value_close(0.0, earlier));
        assert!(value_close(0.0, nan));
        assert_eq!(pid.last_update(), Some(1.0));
        assert!(value_close(integral, pid.integral()));
        assert!(value_close(error, pid.last_error()));
    }

    /// Test that the output vanishes when set point and feedback agree.
    #[test]
    fn test_pid_timed_zero_error() {
        let mut pid = primed(PidGains::new(2.0, 3.0, 0.5));
        for step in 1..50 {
            let output = pid.update(7.5, 7.5, step as f32 * 0.02);
            assert!(value_close(0.0, output), "Output should be zero.");
        }
        assert!(value_close(0.0, pid.integral()), "Integral should stay zero.");
    }

    /// Test that reset makes the controller indistinguishable from a new one.
    #[test]
    fn test_pid_timed_reset_matches_fresh() {
        let gains = PidGains::new(1.5_f32, 0.4, 0.1);
        let mut used = TimedPid::new(gains);
        for step in 0..10 {
            let _ = used.update(3.0, step as f32, step as f32 * 0.1);
        }
        used.reset();
        let mut fresh = TimedPid::new(gains);

        assert_eq!(used.last_update(), None);
        for step in 0..10 {
            let t = 5.0 + step as f32 * 0.05;
            let a = used.update(1.0, 0.3 * step as f32, t);
            let b = fresh.update(1.0, 0.3 * step as f32, t);
            assert!(value_close(a, b), "Reset controller should match a fresh one.");
        }
    }

    /// Test the derivative term on a changing error.
    #[test]
    fn test_pid_timed_derivative() {
        let mut pid = primed(PidGains::new(0.0, 0.0, 1.0));
        let _ = pid.update(1.0, 0.0, 0.5);
        let output = pid.update(3.0, 0.0, 1.0);
        assert!(value_close(4.0, output), "Derivative should be (3 - 1) / 0.5.");
    }
}
