//! Read-only view of the board for the presentation layer.
//!
//! Animation flags are derived here and never stored on the board.

use serde::{Deserialize, Serialize};

use crate::id::SwitchKey;
use crate::switch::SwitchPhase;

/// What an observer needs to draw one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchView {
    pub key: SwitchKey,
    pub label: String,
    pub phase: SwitchPhase,
    pub on: bool,
    /// On while a forcing is pending, or an older switch during a conflict.
    pub shake: bool,
    /// The next switch to drop while the conflict lasts.
    pub shake_strong: bool,
    /// The switch most recently dropped by the conflict.
    pub falling: bool,
}

/// Full observable state of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub switches: Vec<SwitchView>,
    /// Keys of the on switches, oldest first.
    pub order: Vec<SwitchKey>,
    pub forcing: Option<SwitchKey>,
    pub conflict: bool,
}

impl BoardSnapshot {
    /// Look up a switch view by key.
    #[must_use]
    pub fn switch(&self, key: &SwitchKey) -> Option<&SwitchView> {
        self.switches.iter().find(|s| &s.key == key)
    }

    /// Number of switches that are fully on.
    #[must_use]
    pub fn on_count(&self) -> usize {
        self.switches.iter().filter(|s| s.on).count()
    }
}
