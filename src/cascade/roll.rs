// src/cascade/roll.rs

//! # Roll Cascade
//!
//! The inner loop tracks a roll rate and produces a differential thrust
//! command in `[-1, 1]`. With attitude stabilization the stick commands a
//! roll angle, and the outer loop turns the angle error into the roll rate
//! set point; without it the stick commands the roll rate directly.

use crate::pid::TimedPid;
use crate::{ControlLimits, ControllerGains, FlightFeedback, Number, Setpoints, StabilizationModes};

/// Output of the roll cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RollCommand<T> {
    /// Differential thrust command in `[-1, 1]` from the rate loop.
    Stabilized(T),
    /// Rate stabilization is off; the stick drives differential thrust.
    Raw,
}

/// Rate and attitude loops of the roll axis.
pub struct RollCascade<T: Number> {
    rate_pid: TimedPid<T>,
    attitude_pid: TimedPid<T>,
}

impl<T: Number> RollCascade<T> {
    /// Creates both loops from the controller gains.
    pub fn with_gains(gains: &ControllerGains<T>) -> Self {
        RollCascade {
            rate_pid: TimedPid::new(gains.rate),
            attitude_pid: TimedPid::new(gains.attitude),
        }
    }

    /// Computes the roll command for `stick_x` in `[-1, 1]`.
    ///
    /// Updates `setpoints.roll_rate`, and `setpoints.roll` when attitude
    /// stabilization is on; set points of inactive stages are left as they
    /// were.
    pub fn control<F: FlightFeedback<T>>(
        &mut self,
        stick_x: T,
        modes: StabilizationModes,
        limits: &ControlLimits<T>,
        feedback: &F,
        now: T,
        setpoints: &mut Setpoints<T>,
    ) -> RollCommand<T> {
        if !modes.rate() {
            return RollCommand::Raw;
        }

        if modes.attitude() {
            setpoints.roll = stick_x * limits.max_roll;
            setpoints.roll_rate = self
                .attitude_pid
                .update(setpoints.roll, feedback.roll(), now)
                .symmetric(limits.max_roll_rate);
        } else {
            setpoints.roll_rate = stick_x * limits.max_roll_rate;
        }

        let command = self
            .rate_pid
            .update(setpoints.roll_rate, feedback.roll_rate(), now)
            .symmetric(T::one());
        RollCommand::Stabilized(command)
    }

    /// The roll rate loop.
    pub fn rate_pid(&self) -> &TimedPid<T> {
        &self.rate_pid
    }

    /// The roll attitude loop.
    pub fn attitude_pid(&self) -> &TimedPid<T> {
        &self.attitude_pid
    }

    /// Clears the history of both loops.
    pub fn reset(&mut self) {
        self.rate_pid.reset();
        self.attitude_pid.reset();
    }
}
