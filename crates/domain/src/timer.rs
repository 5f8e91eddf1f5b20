//! Timers as data — the board never sleeps, it asks its runtime to.
//!
//! Every delayed transition is named by a [`TimerTicket`]. The board hands
//! out [`Effect::Schedule`] when it wants to be woken later and
//! [`Effect::Cancel`] when an overriding event makes a pending delay moot.
//! The runtime reports a fire back with
//! [`Board::timer_fired`](crate::board::Board::timer_fired).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::SwitchKey;

/// Handle for one scheduled delay. Never reused within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerTicket(pub u64);

impl fmt::Display for TimerTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happens when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerKind {
    /// Finish the forced activation of `key`.
    Activation { key: SwitchKey },
    /// Turn off the earliest-activated switch and clear the conflict.
    Drop,
    /// Scripted toggle of `key`.
    Autoplay { key: SwitchKey },
}

/// Instruction from the board to the runtime that drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call back with `ticket` once `after` has elapsed.
    Schedule {
        ticket: TimerTicket,
        kind: TimerKind,
        after: Duration,
    },
    /// Forget the delay named by `ticket`.
    Cancel { ticket: TimerTicket },
}

/// A delay the board is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub ticket: TimerTicket,
    pub kind: TimerKind,
}

/// Delays used by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long the third switch resists before turning on.
    pub activation_delay: Duration,
    /// How long the conflict lasts before the oldest switch drops.
    pub drop_delay: Duration,
}

impl Timings {
    /// Build timings, rejecting zero delays.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDelay`] when either delay is zero.
    pub fn new(activation_delay: Duration, drop_delay: Duration) -> Result<Self, ValidationError> {
        if activation_delay.is_zero() {
            return Err(ValidationError::ZeroDelay("activation_delay"));
        }
        if drop_delay.is_zero() {
            return Err(ValidationError::ZeroDelay("drop_delay"));
        }
        Ok(Self {
            activation_delay,
            drop_delay,
        })
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            activation_delay: Duration::from_millis(1200),
            drop_delay: Duration::from_secs(15),
        }
    }
}
