//! Switch — a labeled boolean toggle on the board.

mod phase;

pub use phase::SwitchPhase;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::SwitchKey;

/// A single trade-off toggle (e.g. "Fast Delivery").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub key: SwitchKey,
    pub label: String,
    pub phase: SwitchPhase,
}

impl Switch {
    /// Create a switch in the [`Off`](SwitchPhase::Off) phase.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLabel`] when `label` is blank.
    pub fn new(key: SwitchKey, label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ValidationError::EmptyLabel(key.to_string()));
        }
        Ok(Self {
            key,
            label,
            phase: SwitchPhase::Off,
        })
    }

    /// Whether the switch is fully on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.phase == SwitchPhase::On
    }
}
