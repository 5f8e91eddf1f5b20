//! Event — an immutable record of something that happened on the board.
//!
//! The board describes each transition as a list of [`EventKind`]s. The
//! sequencer stamps them into [`Event`]s before publishing.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, SwitchKey};
use crate::snapshot::BoardSnapshot;

/// UTC timestamp attached to every [`Event`].
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Why a switch went off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOffCause {
    /// Someone toggled it off.
    Manual,
    /// It was the oldest switch when the conflict resolved.
    Dropped,
}

/// A single state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    TurnedOn { key: SwitchKey },
    TurnedOff { key: SwitchKey, cause: TurnOffCause },
    ForcingStarted { key: SwitchKey },
    ForcingCompleted { key: SwitchKey },
    ForcingCancelled { key: SwitchKey },
    ConflictStarted,
    ConflictCleared,
    /// A toggle arrived for a switch that is still turning on.
    ToggleIgnored { key: SwitchKey },
    AutoplayScheduled { key: SwitchKey },
    AutoplayCancelled { key: SwitchKey },
    BoardReset,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnedOn { key } => write!(f, "{key} turned on"),
            Self::TurnedOff {
                key,
                cause: TurnOffCause::Manual,
            } => write!(f, "{key} turned off"),
            Self::TurnedOff {
                key,
                cause: TurnOffCause::Dropped,
            } => write!(f, "{key} dropped"),
            Self::ForcingStarted { key } => write!(f, "{key} is being forced on"),
            Self::ForcingCompleted { key } => write!(f, "{key} forced on"),
            Self::ForcingCancelled { key } => write!(f, "{key} forcing cancelled"),
            Self::ConflictStarted => f.write_str("conflict"),
            Self::ConflictCleared => f.write_str("conflict cleared"),
            Self::ToggleIgnored { key } => write!(f, "{key} ignored while turning on"),
            Self::AutoplayScheduled { key } => write!(f, "{key} scheduled by script"),
            Self::AutoplayCancelled { key } => write!(f, "{key} script cancelled"),
            Self::BoardReset => f.write_str("reset"),
        }
    }
}

/// A stamped transition together with the board state right after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub kind: EventKind,
    pub timestamp: Timestamp,
    pub snapshot: BoardSnapshot,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind, snapshot: BoardSnapshot) -> Self {
        Self {
            id: EventId::new(),
            kind,
            timestamp: chrono::Utc::now(),
            snapshot,
        }
    }
}
