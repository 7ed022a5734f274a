// src/cascade.rs

//! # Cascaded Flight Controller
//!
//! The flight controller turns the operator's two stick axes into thrust
//! fractions for the left and right rotors. It is built from two independent
//! cascades of [`TimedPid`](crate::pid::TimedPid) loops:
//!
//! - the roll cascade (attitude → rate → differential thrust), and
//! - the altitude cascade (altitude → vertical rate → throttle).
//!
//! Each stage can be switched on and off through [`StabilizationModes`]. A
//! disabled stage leaves its set points frozen at their last value and does
//! not reset its loops; the history of a loop is only cleared by
//! [`FlightController::reset`] or by a gain change, which rebuilds every loop.
//!
//! The controller reads the plant through the [`FlightFeedback`] trait and
//! expects to see the state produced by the previous tick.

pub mod altitude;
pub use altitude::*;
pub mod config;
pub use config::*;
pub mod mixer;
pub use mixer::*;
pub mod modes;
pub use modes::*;
pub mod roll;
pub use roll::*;

use crate::pid::TimedPid;
use crate::{Number, PidGains, RigidBody, SimError, StickInput};
use log::info;
use serde::{Deserialize, Serialize};

/// Measurements the controller needs from the airframe.
pub trait FlightFeedback<T: Number> {
    /// Roll angle in radians.
    fn roll(&self) -> T;
    /// Roll rate in rad/s.
    fn roll_rate(&self) -> T;
    /// Altitude measured upward from the bottom of an arena `arena_height` tall.
    fn altitude(&self, arena_height: T) -> T;
    /// Vertical speed, positive upward.
    fn climb_rate(&self) -> T;
}

impl<T: Number> FlightFeedback<T> for RigidBody<T> {
    fn roll(&self) -> T {
        self.angle
    }

    fn roll_rate(&self) -> T {
        self.omega
    }

    fn altitude(&self, arena_height: T) -> T {
        RigidBody::altitude(self, arena_height)
    }

    fn climb_rate(&self) -> T {
        // Screen y grows downward.
        -self.vy
    }
}

/// Set points produced by the outer stages during the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Setpoints<T> {
    /// Target altitude.
    pub altitude: T,
    /// Target vertical speed, positive upward.
    pub vertical_speed: T,
    /// Target roll rate in rad/s.
    pub roll_rate: T,
    /// Target roll angle in radians.
    pub roll: T,
}

impl<T: Number> Setpoints<T> {
    /// Set points holding `altitude` with every other target at zero.
    pub fn holding(altitude: T) -> Self {
        Setpoints {
            altitude,
            vertical_speed: T::zero(),
            roll_rate: T::zero(),
            roll: T::zero(),
        }
    }
}

/// The complete two-axis flight controller.
pub struct FlightController<T: Number> {
    roll: RollCascade<T>,
    altitude: AltitudeCascade<T>,
    gains: ControllerGains<T>,
    limits: ControlLimits<T>,
    modes: StabilizationModes,
    setpoints: Setpoints<T>,
    arena_height: T,
}

impl<T: Number> FlightController<T> {
    /// Creates a controller with fresh loops.
    ///
    /// `initial_altitude` seeds the altitude set point so that the first
    /// telemetry sample is meaningful before altitude hold is engaged.
    pub fn with_config(
        gains: ControllerGains<T>,
        limits: ControlLimits<T>,
        modes: StabilizationModes,
        arena_height: T,
        initial_altitude: T,
    ) -> Self {
        FlightController {
            roll: RollCascade::with_gains(&gains),
            altitude: AltitudeCascade::with_gains(&gains),
            gains,
            limits,
            modes,
            setpoints: Setpoints::holding(initial_altitude),
            arena_height,
        }
    }

    /// Runs both cascades for one tick at timestamp `now` and mixes the
    /// result into rotor thrust fractions.
    pub fn control<F: FlightFeedback<T>>(
        &mut self,
        stick: StickInput<T>,
        feedback: &F,
        now: T,
    ) -> ThrustCommand<T> {
        let throttle = self.altitude_control(stick.y(), feedback, now);
        let roll = self.roll_control(stick.x(), feedback, now);
        mix(throttle, roll, stick.x(), self.limits.roll_authority)
    }

    /// Runs the roll cascade alone.
    pub fn roll_control<F: FlightFeedback<T>>(
        &mut self,
        stick_x: T,
        feedback: &F,
        now: T,
    ) -> RollCommand<T> {
        self.roll.control(
            stick_x,
            self.modes,
            &self.limits,
            feedback,
            now,
            &mut self.setpoints,
        )
    }

    /// Runs the altitude cascade alone and returns the throttle.
    pub fn altitude_control<F: FlightFeedback<T>>(
        &mut self,
        stick_y: T,
        feedback: &F,
        now: T,
    ) -> T {
        self.altitude.control(
            stick_y,
            self.modes,
            &self.limits,
            self.arena_height,
            feedback,
            now,
            &mut self.setpoints,
        )
    }

    /// Replaces all gains. Every loop is rebuilt, discarding its history.
    ///
    /// # Errors
    /// [`SimError::InvalidParameter`] when a gain is not finite; nothing
    /// changes in that case.
    pub fn set_gains(&mut self, gains: ControllerGains<T>) -> Result<(), SimError> {
        gains.validate()?;
        self.gains = gains;
        info!("controller gains replaced, rebuilding controllers");
        self.rebuild();
        Ok(())
    }

    /// Replaces the gains of one loop. Every loop is rebuilt, discarding its
    /// history.
    ///
    /// # Errors
    /// [`SimError::InvalidParameter`] when a gain is not finite; nothing
    /// changes in that case.
    pub fn set_loop_gains(
        &mut self,
        control_loop: ControlLoop,
        gains: PidGains<T>,
    ) -> Result<(), SimError> {
        validate_loop_gains(control_loop, &gains)?;
        self.gains.set(control_loop, gains);
        info!("{:?} loop gains changed, rebuilding controllers", control_loop);
        self.rebuild();
        Ok(())
    }

    /// Replaces the saturation limits without touching loop history.
    ///
    /// # Errors
    /// [`SimError::InvalidParameter`] when a speed limit is not positive or
    /// the roll scaling is not finite; nothing changes in that case.
    pub fn set_limits(&mut self, limits: ControlLimits<T>) -> Result<(), SimError> {
        limits.validate()?;
        self.limits = limits;
        Ok(())
    }

    /// Changes the vertical speed limit, which must be positive.
    pub fn set_max_vertical_speed(&mut self, max_vertical_speed: T) -> Result<(), SimError> {
        self.set_limits(ControlLimits {
            max_vertical_speed,
            ..self.limits
        })
    }

    /// Changes the roll rate limit, in rad/s, which must be positive.
    pub fn set_max_roll_rate(&mut self, max_roll_rate: T) -> Result<(), SimError> {
        self.set_limits(ControlLimits {
            max_roll_rate,
            ..self.limits
        })
    }

    /// Switches rate stabilization. Switching it off drops attitude too.
    pub fn set_rate_stabilization(&mut self, enabled: bool) {
        self.modes.set_rate(enabled);
        info!(
            "rate stabilization {}, attitude stabilization {}",
            on_off(self.modes.rate()),
            on_off(self.modes.attitude())
        );
    }

    /// Switches attitude stabilization.
    ///
    /// # Errors
    /// [`SimError::AttitudeRequiresRate`] when rate stabilization is off.
    pub fn set_attitude_stabilization(&mut self, enabled: bool) -> Result<(), SimError> {
        self.modes.set_attitude(enabled)?;
        info!("attitude stabilization {}", on_off(enabled));
        Ok(())
    }

    /// Switches altitude stabilization.
    pub fn set_altitude_stabilization(&mut self, enabled: bool) {
        self.modes.set_altitude(enabled);
        info!("altitude stabilization {}", on_off(enabled));
    }

    /// Clears every loop and holds `altitude` with the other set points at
    /// zero.
    pub fn reset(&mut self, altitude: T) {
        self.roll.reset();
        self.altitude.reset();
        self.setpoints = Setpoints::holding(altitude);
    }

    /// Current gains.
    pub fn gains(&self) -> &ControllerGains<T> {
        &self.gains
    }

    /// Current limits.
    pub fn limits(&self) -> &ControlLimits<T> {
        &self.limits
    }

    /// Current modes.
    pub fn modes(&self) -> StabilizationModes {
        self.modes
    }

    /// Set points of the last tick.
    pub fn setpoints(&self) -> &Setpoints<T> {
        &self.setpoints
    }

    /// Arena height used to map the vertical stick onto altitude.
    pub fn arena_height(&self) -> T {
        self.arena_height
    }

    /// The loop identified by `control_loop`.
    pub fn pid(&self, control_loop: ControlLoop) -> &TimedPid<T> {
        match control_loop {
            ControlLoop::Rate => self.roll.rate_pid(),
            ControlLoop::Attitude => self.roll.attitude_pid(),
            ControlLoop::Altitude => self.altitude.altitude_pid(),
            ControlLoop::VerticalRate => self.altitude.vertical_rate_pid(),
        }
    }

    fn rebuild(&mut self) {
        self.roll = RollCascade::with_gains(&self.gains);
        self.altitude = AltitudeCascade::with_gains(&self.gains);
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::BodyParams;

    fn controller() -> FlightController<f64> {
        FlightController::with_config(
            ControllerGains::default(),
            ControlLimits::default(),
            StabilizationModes::manual(),
            500.0,
            300.0,
        )
    }

    /// Test the released stick in manual mode.
    #[test]
    fn test_controller_manual_idle_stick() {
        let mut controller = controller();
        let body = RigidBody::new(&BodyParams::default());
        let thrust = controller.control(StickInput::neutral(), &body, 0.0);
        assert_eq!(thrust, ThrustCommand { left: 0.0, right: 0.0 });
    }

    /// Test full forward stick in manual mode.
    #[test]
    fn test_controller_manual_full_throttle() {
        let mut controller = controller();
        let body = RigidBody::new(&BodyParams::default());
        let thrust = controller.control(StickInput::new(0.0, -1.0), &body, 0.0);
        assert_eq!(thrust, ThrustCommand { left: 1.0, right: 1.0 });
    }

    /// Test raw differential thrust from the horizontal stick.
    #[test]
    fn test_controller_raw_roll_mix() {
        let mut controller = controller();
        let body = RigidBody::new(&BodyParams::default());
        assert_eq!(controller.roll_control(1.0, &body, 0.0), RollCommand::Raw);

        let thrust = controller.control(StickInput::new(1.0, 0.0), &body, 0.0);
        assert!(vector_close((0.85, 0.15), (thrust.left, thrust.right)));
    }

    /// Test the feedback read from a rigid body.
    #[test]
    fn test_controller_feedback_from_body() {
        let mut body = RigidBody::new(&BodyParams::<f64>::default());
        body.vy = 2.0;
        body.angle = 0.2;
        body.omega = -0.3;
        assert_eq!(body.climb_rate(), -2.0);
        assert_eq!(body.roll(), 0.2);
        assert_eq!(body.roll_rate(), -0.3);
        assert_eq!(FlightFeedback::altitude(&body, 500.0), 300.0);
    }

    /// Test that a gain change rebuilds every loop.
    #[test]
    fn test_controller_gain_change_resets_loops() {
        let mut controller = controller();
        controller.set_rate_stabilization(true);
        controller.set_altitude_stabilization(true);
        let body = RigidBody::new(&BodyParams::default());
        for step in 0..5 {
            let _ = controller.control(StickInput::new(0.3, 0.0), &body, step as f64 * 0.02);
        }
        for control_loop in [ControlLoop::Rate, ControlLoop::Altitude, ControlLoop::VerticalRate] {
            assert!(controller.pid(control_loop).last_update().is_some());
        }

        controller
            .set_loop_gains(ControlLoop::Altitude, PidGains::new(0.2, 0.01, 0.0))
            .unwrap();

        assert_eq!(controller.gains().altitude, PidGains::new(0.2, 0.01, 0.0));
        for control_loop in ControlLoop::ALL {
            assert_eq!(controller.pid(control_loop).last_update(), None);
            assert_eq!(controller.pid(control_loop).gains(), controller.gains().get(control_loop));
        }
    }

    /// Test that limit changes keep loop history.
    #[test]
    fn test_controller_limit_change_keeps_history() {
        let mut controller = controller();
        controller.set_rate_stabilization(true);
        let body = RigidBody::new(&BodyParams::default());
        let _ = controller.control(StickInput::new(0.3, 0.0), &body, 0.0);

        controller.set_max_roll_rate(1.0).unwrap();
        controller.set_max_vertical_speed(10.0).unwrap();

        assert_eq!(controller.pid(ControlLoop::Rate).last_update(), Some(0.0));
        assert_eq!(controller.limits().max_roll_rate, 1.0);
        assert_eq!(controller.limits().max_vertical_speed, 10.0);
    }

    /// Test that invalid runtime limits and gains are rejected without
    /// touching the controller.
    #[test]
    fn test_controller_rejects_invalid_updates() {
        let mut controller = controller();
        controller.set_altitude_stabilization(true);
        let body = RigidBody::new(&BodyParams::default());
        let _ = controller.control(StickInput::new(0.0, -1.0), &body, 0.0);
        let _ = controller.control(StickInput::new(0.0, -1.0), &body, 0.02);
        let error = controller.pid(ControlLoop::Altitude).last_error();
        let limits = *controller.limits();

        assert!(matches!(
            controller.set_max_vertical_speed(-10.0),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(controller.set_max_roll_rate(0.0).is_err());
        assert!(controller.set_max_roll_rate(f64::NAN).is_err());
        let mut bad_limits = limits;
        bad_limits.max_roll = f64::INFINITY;
        assert!(controller.set_limits(bad_limits).is_err());
        assert_eq!(*controller.limits(), limits);

        let gains = *controller.gains();
        assert!(controller
            .set_loop_gains(ControlLoop::Rate, PidGains::new(f64::NAN, 0.0, 0.0))
            .is_err());
        let mut bad_gains = gains;
        bad_gains.attitude.ki = f64::INFINITY;
        assert!(controller.set_gains(bad_gains).is_err());
        assert_eq!(*controller.gains(), gains);

        // The loops keep their history after a rejected update.
        assert!(value_not_close(0.0, error), "Altitude loop should have seen an error.");
        assert!(value_close(error, controller.pid(ControlLoop::Altitude).last_error()));
        assert_eq!(controller.pid(ControlLoop::Altitude).last_update(), Some(0.02));
    }

    /// Test that switching a stage off and on keeps its history.
    #[test]
    fn test_controller_toggling_keeps_history() {
        let mut controller = controller();
        controller.set_altitude_stabilization(true);
        let body = RigidBody::new(&BodyParams::default());
        let _ = controller.control(StickInput::new(0.0, 0.0), &body, 0.0);
        let _ = controller.control(StickInput::new(0.0, 0.0), &body, 0.02);
        let integral = controller.pid(ControlLoop::Altitude).integral();

        controller.set_altitude_stabilization(false);
        controller.set_altitude_stabilization(true);

        assert_eq!(controller.pid(ControlLoop::Altitude).integral(), integral);
        assert_eq!(controller.pid(ControlLoop::Altitude).last_update(), Some(0.02));
    }

    /// Test the rate requirement of attitude stabilization.
    #[test]
    fn test_controller_attitude_switch_rules() {
        let mut controller = controller();
        assert!(controller.set_attitude_stabilization(true).is_err());
        controller.set_rate_stabilization(true);
        assert!(controller.set_attitude_stabilization(true).is_ok());
        controller.set_rate_stabilization(false);
        assert!(!controller.modes().attitude());
    }

    /// Test controller reset.
    #[test]
    fn test_controller_reset() {
        let mut controller = controller();
        controller.set_altitude_stabilization(true);
        let body = RigidBody::new(&BodyParams::default());
        let _ = controller.control(StickInput::new(0.0, -1.0), &body, 0.0);
        let _ = controller.control(StickInput::new(0.0, -1.0), &body, 0.02);
        assert!(controller.setpoints().vertical_speed > 0.0);

        controller.reset(250.0);

        assert_eq!(*controller.setpoints(), Setpoints::holding(250.0));
        for control_loop in ControlLoop::ALL {
            assert_eq!(controller.pid(control_loop).last_update(), None);
        }
    }
}
