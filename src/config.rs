// src/config.rs

//! # Simulation Configuration
//!
//! [`SimConfig`] gathers every tunable of the simulation. It can be built in
//! code, starting from [`SimConfig::default`], or read from JSON or YAML.
//! Sections and fields missing from a file keep their defaults, so a file
//! only needs to name what it changes:
//!
//! ```
//! use twin_rotor_sim::SimConfig;
//!
//! let config = SimConfig::<f64>::from_yaml_str(
//!     "gains:\n  altitude: { kp: 0.2, ki: 0.01, kd: 0.0 }\nmodes:\n  altitude: true\n",
//! )
//! .unwrap();
//!
//! assert_eq!(config.gains.altitude.kp, 0.2);
//! assert!(config.modes.altitude());
//! assert_eq!(config.body.mass, 1.2);
//! ```

use crate::{BodyParams, ControlLimits, ControllerGains, Number, SimError, StabilizationModes};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Extent of the visible arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct ArenaParams<T> {
    /// Width in pixels.
    pub width: T,
    /// Height in pixels; full upward stick targets this altitude.
    pub height: T,
}

impl<T: Number> Default for ArenaParams<T> {
    fn default() -> Self {
        Self {
            width: T::lit(800.0),
            height: T::lit(500.0),
        }
    }
}

/// Tick timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct TimingParams<T> {
    /// Longest step the integrator is allowed to take, in seconds.
    pub max_step: T,
}

impl<T: Number> Default for TimingParams<T> {
    fn default() -> Self {
        Self {
            max_step: T::lit(0.04),
        }
    }
}

/// Telemetry sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct TelemetryParams<T> {
    /// Whether samples are recorded at all.
    pub enabled: bool,
    /// Minimum simulated time between samples, in seconds.
    pub interval: T,
    /// Number of lines kept before the oldest are dropped.
    pub capacity: usize,
}

impl<T: Number> Default for TelemetryParams<T> {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: T::lit(0.033),
            capacity: 5000,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Number + Deserialize<'de>"))]
pub struct SimConfig<T> {
    /// Airframe and ground.
    pub body: BodyParams<T>,
    /// Loop gains.
    pub gains: ControllerGains<T>,
    /// Loop limits and stick scaling.
    pub limits: ControlLimits<T>,
    /// Stabilization modes at start-up.
    pub modes: StabilizationModes,
    /// Arena extent.
    pub arena: ArenaParams<T>,
    /// Tick timing.
    pub timing: TimingParams<T>,
    /// Telemetry sampling.
    pub telemetry: TelemetryParams<T>,
}

impl<T: Number> Default for SimConfig<T> {
    fn default() -> Self {
        Self {
            body: BodyParams::default(),
            gains: ControllerGains::default(),
            limits: ControlLimits::default(),
            modes: StabilizationModes::manual(),
            arena: ArenaParams::default(),
            timing: TimingParams::default(),
            telemetry: TelemetryParams::default(),
        }
    }
}

impl<T: Number + DeserializeOwned> SimConfig<T> {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file; the format follows the extension
    /// (`.json`, `.yaml` or `.yml`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Err(SimError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl<T: Number> SimConfig<T> {
    /// Checks the physical preconditions of the model.
    ///
    /// Mass, moment of inertia, pixel scale, airframe size, maximum step,
    /// telemetry capacity and the limits must be positive and finite; gains
    /// and damping coefficients must be finite.
    pub fn validate(&self) -> Result<(), SimError> {
        let body = &self.body;
        positive("body.mass", body.mass)?;
        positive("body.moment_of_inertia", body.moment_of_inertia)?;
        positive("body.pixels_per_meter", body.pixels_per_meter)?;
        positive("body.width", body.width)?;
        positive("body.height", body.height)?;
        positive("arena.height", self.arena.height)?;
        positive("timing.max_step", self.timing.max_step)?;
        finite("body.gravity", body.gravity)?;
        finite("body.ground_y", body.ground_y)?;
        finite("body.thrust_to_weight", body.thrust_to_weight)?;
        finite("body.linear_damping", body.linear_damping)?;
        finite("body.angular_damping", body.angular_damping)?;
        finite("body.ground_friction", body.ground_friction)?;
        finite("telemetry.interval", self.telemetry.interval)?;

        self.limits.validate()?;
        self.gains.validate()?;

        if self.telemetry.capacity == 0 {
            return Err(SimError::InvalidParameter(
                "telemetry.capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn positive<T: Number>(name: &str, value: T) -> Result<(), SimError> {
    if value.is_finite() && value > T::zero() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter(format!(
            "{name} must be positive and finite"
        )))
    }
}

pub(crate) fn finite<T: Number>(name: &str, value: T) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter(format!("{name} must be finite")))
    }
}
