// src/cascade/mixer.rs

//! Mixes throttle and roll command into per-rotor thrust fractions.

use super::RollCommand;
use crate::Number;
use serde::{Deserialize, Serialize};

/// Thrust fractions for the two rotors, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustCommand<T> {
    /// Left rotor fraction.
    pub left: T,
    /// Right rotor fraction.
    pub right: T,
}

/// Splits `throttle` between the rotors.
///
/// The differential is the stabilized roll command, or `stick_x` in raw
/// mode, scaled by `authority`. Half of it is added to the left rotor and
/// half subtracted from the right one before both are saturated.
pub fn mix<T: Number>(
    throttle: T,
    roll: RollCommand<T>,
    stick_x: T,
    authority: T,
) -> ThrustCommand<T> {
    let differential = match roll {
        RollCommand::Stabilized(command) => command * authority,
        RollCommand::Raw => stick_x * authority,
    };
    let half = differential / (T::one() + T::one());

    ThrustCommand {
        left: (throttle + half).unit(),
        right: (throttle - half).unit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    /// Test raw mixing at full right stick.
    #[test]
    fn test_mix_raw_full_right_stick() {
        let thrust = mix(0.5_f32, RollCommand::Raw, 1.0, 0.7);
        assert!(vector_close((0.85, 0.15), (thrust.left, thrust.right)));
    }

    /// Test that raw mixing at idle throttle saturates at zero.
    #[test]
    fn test_mix_raw_at_idle_saturates() {
        let thrust = mix(0.0_f32, RollCommand::Raw, 1.0, 0.7);
        assert!(vector_close((0.35, 0.0), (thrust.left, thrust.right)));

        let thrust = mix(1.0_f32, RollCommand::Raw, -1.0, 0.7);
        assert!(vector_close((0.65, 1.0), (thrust.left, thrust.right)));
    }

    /// Test that a stabilized command replaces the stick.
    #[test]
    fn test_mix_stabilized_ignores_stick() {
        let thrust = mix(0.4_f32, RollCommand::Stabilized(-0.5), 1.0, 0.7);
        assert!(vector_close((0.225, 0.575), (thrust.left, thrust.right)));
    }

    /// Test mixing without differential.
    #[test]
    fn test_mix_centered_is_symmetric() {
        let thrust = mix(0.3_f32, RollCommand::Stabilized(0.0), 0.0, 0.7);
        assert_eq!(thrust.left, thrust.right);
        let thrust = mix(0.3_f32, RollCommand::Raw, 0.0, 0.7);
        assert_eq!(thrust.left, thrust.right);
    }
}
