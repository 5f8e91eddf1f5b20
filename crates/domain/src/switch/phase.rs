//! Switch phase — where a switch is in its on/off lifecycle.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a switch.
///
/// `TurningOn` is the forced, delayed activation of the third switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPhase {
    #[default]
    Off,
    TurningOn,
    On,
}

impl std::fmt::Display for SwitchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::TurningOn => f.write_str("turning_on"),
            Self::On => f.write_str("on"),
        }
    }
}
