// src/error.rs

//! Error type for configuration and operator commands.
//!
//! The numerical core (integrator, loops, mixer) never fails; errors only
//! arise where outside input enters the simulation.

use thiserror::Error;

/// Errors reported by the simulation.
#[derive(Error, Debug)]
pub enum SimError {
    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON configuration could not be parsed.
    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML configuration could not be parsed.
    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension does not name a supported configuration format.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// A parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Attitude stabilization was requested while rate stabilization is off.
    #[error("attitude stabilization requires rate stabilization")]
    AttitudeRequiresRate,
}
