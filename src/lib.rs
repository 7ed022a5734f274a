// src/lib.rs

//! # Twin-Rotor Flight Simulation
//!
//! A planar simulation of a drone with two rotors: a rigid body moving in the
//! screen plane under gravity, rotor thrust and damping, resting on a flat
//! ground, and a cascaded PID flight controller with independently switchable
//! stabilization stages.
//!
//! - [`body`]: rigid-body dynamics and ground contact.
//! - [`pid`]: PID loops driven by timestamps.
//! - [`cascade`]: the roll and altitude cascades and the thrust mixer.
//! - [`simulation`]: the per-frame driver.
//! - [`config`] and [`telemetry`]: configuration files and the flight log.
//!
//! ```
//! use twin_rotor_sim::{tick, SimConfig, SimulationState};
//!
//! let mut sim = SimulationState::<f64>::new(SimConfig::default()).unwrap();
//! sim.controller_mut().set_altitude_stabilization(true);
//! sim.set_stick(0.0, -0.2);
//! for _ in 0..60 {
//!     tick(&mut sim, 1.0 / 60.0);
//! }
//! assert!(sim.elapsed() > 0.99);
//! ```

#![deny(missing_docs)]

pub mod body;
pub mod cascade;
pub mod config;
pub mod error;
pub mod input;
pub mod number;
pub mod pid;
pub mod simulation;
pub mod telemetry;

#[doc(inline)]
pub use body::*;
#[doc(inline)]
pub use cascade::*;
pub use config::*;
pub use error::*;
pub use input::*;
pub use number::*;
pub use pid::*;
pub use simulation::*;
pub use telemetry::*;

#[cfg(test)]
mod test_utils;
