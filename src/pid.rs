// src/pid.rs

//! # PID Control Module
//!
//! This module provides the compute function and the timestamped controller
//! wrapper used by every loop of the flight controller.

pub mod timed;
pub use timed::*;
