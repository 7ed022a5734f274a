// src/cascade/config.rs

//! Gains and saturation limits of the flight controller.

use crate::config::{finite, positive};
use crate::{Number, PidGains, SimError};
use serde::{Deserialize, Serialize};

/// Identifies one PID loop of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLoop {
    /// Inner roll loop: roll rate to differential thrust.
    Rate,
    /// Outer roll loop: roll angle to roll rate.
    Attitude,
    /// Outer vertical loop: altitude to vertical speed.
    Altitude,
    /// Inner vertical loop: vertical speed to throttle.
    VerticalRate,
}

impl ControlLoop {
    /// All loops, inner roll loop first.
    pub const ALL: [ControlLoop; 4] = [
        ControlLoop::Rate,
        ControlLoop::Attitude,
        ControlLoop::Altitude,
        ControlLoop::VerticalRate,
    ];
}

/// Gain triples of the four loops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct ControllerGains<T> {
    /// Roll rate loop gains.
    pub rate: PidGains<T>,
    /// Roll attitude loop gains.
    pub attitude: PidGains<T>,
    /// Altitude loop gains.
    pub altitude: PidGains<T>,
    /// Vertical rate loop gains.
    pub vertical_rate: PidGains<T>,
}

impl<T: Number> Default for ControllerGains<T> {
    fn default() -> Self {
        Self {
            rate: PidGains::proportional(T::lit(4.0)),
            attitude: PidGains::proportional(T::lit(4.0)),
            altitude: PidGains::proportional(T::lit(0.1)),
            vertical_rate: PidGains::proportional(T::lit(0.1)),
        }
    }
}

impl<T: Number> ControllerGains<T> {
    /// Gains of one loop.
    pub fn get(&self, control_loop: ControlLoop) -> PidGains<T> {
        match control_loop {
            ControlLoop::Rate => self.rate,
            ControlLoop::Attitude => self.attitude,
            ControlLoop::Altitude => self.altitude,
            ControlLoop::VerticalRate => self.vertical_rate,
        }
    }

    /// Replaces the gains of one loop.
    pub fn set(&mut self, control_loop: ControlLoop, gains: PidGains<T>) {
        match control_loop {
            ControlLoop::Rate => self.rate = gains,
            ControlLoop::Attitude => self.attitude = gains,
            ControlLoop::Altitude => self.altitude = gains,
            ControlLoop::VerticalRate => self.vertical_rate = gains,
        }
    }

    /// Checks that every gain is finite.
    pub fn validate(&self) -> Result<(), SimError> {
        for control_loop in ControlLoop::ALL {
            validate_loop_gains(control_loop, &self.get(control_loop))?;
        }
        Ok(())
    }
}

/// Checks that the gains of `control_loop` are finite.
pub fn validate_loop_gains<T: Number>(
    control_loop: ControlLoop,
    gains: &PidGains<T>,
) -> Result<(), SimError> {
    let name = format!("gains.{:?}", control_loop);
    for value in [gains.kp, gains.ki, gains.kd] {
        finite(&name, value)?;
    }
    Ok(())
}

/// Saturation limits and stick scaling of the flight controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct ControlLimits<T> {
    /// Largest commanded vertical speed.
    pub max_vertical_speed: T,
    /// Largest commanded roll rate in rad/s.
    pub max_roll_rate: T,
    /// Roll angle commanded at full stick deflection, in radians.
    pub max_roll: T,
    /// Share of the throttle range available for differential thrust.
    pub roll_authority: T,
}

impl<T: Number> Default for ControlLimits<T> {
    fn default() -> Self {
        Self {
            max_vertical_speed: T::lit(50.0),
            max_roll_rate: T::lit(400.0).to_radians(),
            max_roll: T::lit(45.0).to_radians(),
            roll_authority: T::lit(0.7),
        }
    }
}

impl<T: Number> ControlLimits<T> {
    /// Checks that the speed limits are positive and the roll scaling is
    /// finite.
    pub fn validate(&self) -> Result<(), SimError> {
        positive("limits.max_vertical_speed", self.max_vertical_speed)?;
        positive("limits.max_roll_rate", self.max_roll_rate)?;
        finite("limits.max_roll", self.max_roll)?;
        finite("limits.roll_authority", self.roll_authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    /// Test default loop gains.
    #[test]
    fn test_controller_gains_defaults() {
        let gains = ControllerGains::<f32>::default();
        assert_eq!(gains.rate, PidGains::new(4.0, 0.0, 0.0));
        assert_eq!(gains.attitude, PidGains::new(4.0, 0.0, 0.0));
        assert_eq!(gains.altitude, PidGains::new(0.1, 0.0, 0.0));
        assert_eq!(gains.vertical_rate, PidGains::new(0.1, 0.0, 0.0));
    }

    /// Test per-loop gain access.
    #[test]
    fn test_controller_gains_get_set() {
        let mut gains = ControllerGains::<f64>::default();
        for (index, control_loop) in ControlLoop::ALL.into_iter().enumerate() {
            let triple = PidGains::new(index as f64, 0.5, 0.25);
            gains.set(control_loop, triple);
            assert_eq!(gains.get(control_loop), triple);
        }
        assert_eq!(gains.rate.kp, 0.0);
        assert_eq!(gains.vertical_rate.kp, 3.0);
    }

    /// Test default limits.
    #[test]
    fn test_control_limits_defaults() {
        let limits = ControlLimits::<f32>::default();
        assert!(value_close(50.0, limits.max_vertical_speed));
        assert!(value_close(6.981317, limits.max_roll_rate));
        assert!(value_close(0.7853982, limits.max_roll));
        assert!(value_close(0.7, limits.roll_authority));
    }

    /// Test that non-positive or non-finite limits are rejected.
    #[test]
    fn test_control_limits_validate() {
        assert!(ControlLimits::<f64>::default().validate().is_ok());

        let mut limits = ControlLimits::<f64>::default();
        limits.max_vertical_speed = -5.0;
        assert!(matches!(limits.validate(), Err(SimError::InvalidParameter(_))));

        let mut limits = ControlLimits::<f64>::default();
        limits.max_roll_rate = 0.0;
        assert!(limits.validate().is_err());

        let mut limits = ControlLimits::<f64>::default();
        limits.roll_authority = f64::INFINITY;
        assert!(limits.validate().is_err());
    }

    /// Test that non-finite gains are rejected.
    #[test]
    fn test_controller_gains_validate() {
        assert!(ControllerGains::<f32>::default().validate().is_ok());

        let mut gains = ControllerGains::<f32>::default();
        gains.vertical_rate.kd = f32::NAN;
        assert!(matches!(gains.validate(), Err(SimError::InvalidParameter(_))));
        assert!(validate_loop_gains(ControlLoop::Rate, &PidGains::new(1.0_f32, f32::INFINITY, 0.0)).is_err());
    }
}
