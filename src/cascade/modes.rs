// src/cascade/modes.rs

//! Stabilization mode switches.
//!
//! Three independent switches select which loops run. The attitude loop
//! feeds the rate loop, so it can only be enabled while rate stabilization is
//! on; turning rate stabilization off turns attitude stabilization off too.

use crate::SimError;
use serde::{Deserialize, Serialize};

/// Plain switch values, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSwitches {
    /// Roll rate stabilization.
    pub rate: bool,
    /// Roll attitude stabilization.
    pub attitude: bool,
    /// Altitude stabilization.
    pub altitude: bool,
}

/// Validated stabilization modes; attitude implies rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ModeSwitches", into = "ModeSwitches")]
pub struct StabilizationModes {
    rate: bool,
    attitude: bool,
    altitude: bool,
}

impl StabilizationModes {
    /// All loops disabled: raw stick to thrust.
    pub fn manual() -> Self {
        Self::default()
    }

    /// Whether the roll rate loop runs.
    pub fn rate(&self) -> bool {
        self.rate
    }

    /// Whether the roll attitude loop runs.
    pub fn attitude(&self) -> bool {
        self.attitude
    }

    /// Whether the altitude loops run.
    pub fn altitude(&self) -> bool {
        self.altitude
    }

    /// Whether attitude stabilization may currently be switched on.
    pub fn attitude_available(&self) -> bool {
        self.rate
    }

    /// Switches rate stabilization; switching it off also drops attitude.
    pub fn set_rate(&mut self, enabled: bool) {
        self.rate = enabled;
        if !enabled {
            self.attitude = false;
        }
    }

    /// Switches attitude stabilization.
    ///
    /// # Errors
    /// [`SimError::AttitudeRequiresRate`] when enabling while rate
    /// stabilization is off; the modes are left unchanged.
    pub fn set_attitude(&mut self, enabled: bool) -> Result<(), SimError> {
        if enabled && !self.rate {
            return Err(SimError::AttitudeRequiresRate);
        }
        self.attitude = enabled;
        Ok(())
    }

    /// Switches altitude stabilization.
    pub fn set_altitude(&mut self, enabled: bool) {
        self.altitude = enabled;
    }
}

impl TryFrom<ModeSwitches> for StabilizationModes {
    type Error = SimError;

    fn try_from(switches: ModeSwitches) -> Result<Self, Self::Error> {
        let mut modes = StabilizationModes::manual();
        modes.set_rate(switches.rate);
        modes.set_attitude(switches.attitude)?;
        modes.set_altitude(switches.altitude);
        Ok(modes)
    }
}

impl From<StabilizationModes> for ModeSwitches {
    fn from(modes: StabilizationModes) -> Self {
        ModeSwitches {
            rate: modes.rate,
            attitude: modes.attitude,
            altitude: modes.altitude,
        }
    }
}
