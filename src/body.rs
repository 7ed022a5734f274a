// src/body.rs

//! # Planar Rigid Body Module
//!
//! This module models the airframe as a single rigid rectangle moving in a
//! vertical plane, with one rotor at each end of its long axis. Positions are
//! expressed in display pixels with `y` growing downward; velocities and
//! accelerations are SI and converted to pixels with
//! [`BodyParams::pixels_per_meter`] when the position is advanced.
//!
//! Thrust always acts along the body's own "up" axis, so tilting the airframe
//! trades vertical lift for horizontal force. Any imbalance between the left
//! and right rotors produces a roll torque about the centre of mass.
//!
//! ## Preconditions
//!
//! `mass`, `moment_of_inertia` and `pixels_per_meter` must be positive, and
//! [`RigidBody::step`] expects a small positive `dt`. Neither is checked here;
//! [`SimConfig::validate`](crate::SimConfig::validate) checks the parameters
//! and the simulation driver clamps `dt`.

pub mod contact;
pub use contact::*;

use crate::{wrap_angle, Number};
use serde::{Deserialize, Serialize};

/// Physical and geometric parameters of the airframe and its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct BodyParams<T> {
    /// Mass in kilograms.
    pub mass: T,
    /// Moment of inertia about the roll axis in kg·m².
    pub moment_of_inertia: T,
    /// Gravitational acceleration in m/s².
    pub gravity: T,
    /// Airframe width (rotor to rotor) in pixels.
    pub width: T,
    /// Airframe height in pixels.
    pub height: T,
    /// Conversion factor between metres and pixels.
    pub pixels_per_meter: T,
    /// Vertical pixel coordinate of the ground line.
    pub ground_y: T,
    /// Maximum thrust of one rotor as a multiple of the airframe weight.
    pub thrust_to_weight: T,
    /// Linear air drag coefficient in 1/s.
    pub linear_damping: T,
    /// Angular air drag coefficient in 1/s.
    pub angular_damping: T,
    /// Velocity retained per step while resting flat on the ground.
    pub ground_friction: T,
    /// Horizontal pixel coordinate of the canonical pose.
    pub spawn_x: T,
    /// Vertical pixel coordinate of the canonical pose.
    pub spawn_y: T,
}

impl<T: Number> Default for BodyParams<T> {
    fn default() -> Self {
        Self {
            mass: T::lit(1.2),
            moment_of_inertia: T::lit(0.08),
            gravity: T::lit(9.81),
            width: T::lit(80.0),
            height: T::lit(20.0),
            pixels_per_meter: T::lit(80.0),
            ground_y: T::lit(450.0),
            thrust_to_weight: T::lit(2.0),
            linear_damping: T::lit(0.3),
            angular_damping: T::lit(2.0),
            ground_friction: T::lit(0.3),
            spawn_x: T::lit(400.0),
            spawn_y: T::lit(200.0),
        }
    }
}

impl<T: Number> BodyParams<T> {
    /// Weight of the airframe in newtons.
    pub fn weight(&self) -> T {
        self.mass * self.gravity
    }

    /// Force produced by one rotor at full thrust, in newtons.
    pub fn max_rotor_thrust(&self) -> T {
        self.weight() * self.thrust_to_weight
    }

    /// Distance from the centre of mass to each rotor, in metres.
    pub fn arm(&self) -> T {
        self.width / (T::one() + T::one()) / self.pixels_per_meter
    }
}

/// Kinematic state of the airframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody<T> {
    /// Horizontal position in pixels.
    pub x: T,
    /// Vertical position in pixels, growing downward.
    pub y: T,
    /// Horizontal velocity in m/s.
    pub vx: T,
    /// Vertical velocity in m/s, positive downward.
    pub vy: T,
    /// Horizontal acceleration of the last step in m/s².
    pub ax: T,
    /// Vertical acceleration of the last step in m/s².
    pub ay: T,
    /// Roll angle in radians, within `(-π, π]`.
    pub angle: T,
    /// Roll rate in rad/s.
    pub omega: T,
    /// Roll acceleration of the last step in rad/s².
    pub alpha: T,
    /// Left rotor thrust fraction in `[0, 1]`.
    pub left_thrust: T,
    /// Right rotor thrust fraction in `[0, 1]`.
    pub right_thrust: T,
}

impl<T: Number> RigidBody<T> {
    /// Creates a body in the canonical resting pose.
    pub fn new(params: &BodyParams<T>) -> Self {
        Self {
            x: params.spawn_x,
            y: params.spawn_y,
            vx: T::zero(),
            vy: T::zero(),
            ax: T::zero(),
            ay: T::zero(),
            angle: T::zero(),
            omega: T::zero(),
            alpha: T::zero(),
            left_thrust: T::zero(),
            right_thrust: T::zero(),
        }
    }

    /// Returns the body to the canonical resting pose.
    pub fn reset(&mut self, params: &BodyParams<T>) {
        *self = Self::new(params);
    }

    /// Sets both thrust fractions, saturating each to `[0, 1]`.
    pub fn set_thrust(&mut self, left: T, right: T) {
        self.left_thrust = left.unit();
        self.right_thrust = right.unit();
    }

    /// Advances the body by `dt` seconds under the current thrust.
    pub fn step(&mut self, params: &BodyParams<T>, dt: T) {
        let max_thrust = params.max_rotor_thrust();
        let left_force = self.left_thrust * max_thrust;
        let right_force = self.right_thrust * max_thrust;

        // Rotor forces follow the body's up axis.
        let (sin, cos) = self.angle.sin_cos();
        let lift = left_force + right_force;
        let force_x = sin * lift;
        let force_y = -cos * lift + params.weight();

        let mut torque = params.arm() * (left_force - right_force);
        torque = torque + resolve_ground_contact(self, params);

        self.ax = force_x / params.mass;
        self.ay = force_y / params.mass;
        self.alpha = torque / params.moment_of_inertia;

        self.vx = self.vx + self.ax * dt;
        self.vy = self.vy + self.ay * dt;
        self.omega = self.omega + self.alpha * dt;

        self.vx = self.vx - self.vx * params.linear_damping * dt;
        self.vy = self.vy - self.vy * params.linear_damping * dt;
        self.omega = self.omega - self.omega * params.angular_damping * dt;

        self.x = self.x + self.vx * dt * params.pixels_per_meter;
        self.y = self.y + self.vy * dt * params.pixels_per_meter;
        self.angle = wrap_angle(self.angle + self.omega * dt);
    }

    /// Height of the centre of mass above the bottom edge of an arena
    /// `arena_height` pixels tall, in pixels.
    pub fn altitude(&self, arena_height: T) -> T {
        arena_height - self.y
    }

    /// Snapshot of the observable state for rendering and logging.
    pub fn state(&self, params: &BodyParams<T>) -> BodyState<T> {
        let max_thrust = params.max_rotor_thrust();
        BodyState {
            x: self.x,
            y: self.y,
            vx: self.vx,
            vy: self.vy,
            angle: self.angle,
            omega: self.omega,
            left_thrust: self.left_thrust,
            right_thrust: self.right_thrust,
            left_force: self.left_thrust * max_thrust,
            right_force: self.right_thrust * max_thrust,
        }
    }
}

/// Observable state of the body after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState<T> {
    /// Horizontal position in pixels.
    pub x: T,
    /// Vertical position in pixels, growing downward.
    pub y: T,
    /// Horizontal velocity in m/s.
    pub vx: T,
    /// Vertical velocity in m/s, positive downward.
    pub vy: T,
    /// Roll angle in radians.
    pub angle: T,
    /// Roll rate in rad/s.
    pub omega: T,
    /// Left rotor thrust fraction.
    pub left_thrust: T,
    /// Right rotor thrust fraction.
    pub right_thrust: T,
    /// Left rotor force in newtons, for drawing thrust vectors.
    pub left_force: T,
    /// Right rotor force in newtons, for drawing thrust vectors.
    pub right_force: T,
}
