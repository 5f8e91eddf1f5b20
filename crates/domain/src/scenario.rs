//! Scenario — the scripted opening of the sequence.
//!
//! A scenario turns some switches on when the board is mounted and may
//! schedule one scripted toggle (the "autoplay") a little later, which is
//! how the demo forces the third switch without anyone touching it.

use std::collections::HashSet;
use std::time::Duration;

use crate::board::SWITCH_COUNT;
use crate::error::ValidationError;
use crate::id::SwitchKey;
use crate::switch::Switch;

/// A scripted toggle fired once after `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autoplay {
    pub key: SwitchKey,
    pub after: Duration,
}

/// Initial state and optional scripted step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    /// Switches turned on at mount, in this order.
    pub initial_on: Vec<SwitchKey>,
    pub autoplay: Option<Autoplay>,
}

impl Scenario {
    /// Check the scenario against the switches of a board.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when:
    /// - more than two switches start on ([`ValidationError::TooManyInitial`])
    /// - a key is listed twice ([`ValidationError::DuplicateKey`])
    /// - a key is not on the board ([`ValidationError::UnknownScenarioKey`])
    /// - the autoplay key is also turned on initially
    ///   ([`ValidationError::AutoplayAlreadyOn`])
    /// - the autoplay delay is zero ([`ValidationError::ZeroDelay`])
    pub fn validate(&self, switches: &[Switch]) -> Result<(), ValidationError> {
        let max = SWITCH_COUNT - 1;
        if self.initial_on.len() > max {
            return Err(ValidationError::TooManyInitial {
                max,
                actual: self.initial_on.len(),
            });
        }

        let known: HashSet<&SwitchKey> = switches.iter().map(|s| &s.key).collect();
        let mut seen = HashSet::new();
        for key in &self.initial_on {
            if !known.contains(key) {
                return Err(ValidationError::UnknownScenarioKey(key.to_string()));
            }
            if !seen.insert(key) {
                return Err(ValidationError::DuplicateKey(key.to_string()));
            }
        }

        if let Some(autoplay) = &self.autoplay {
            if !known.contains(&autoplay.key) {
                return Err(ValidationError::UnknownScenarioKey(autoplay.key.to_string()));
            }
            if seen.contains(&autoplay.key) {
                return Err(ValidationError::AutoplayAlreadyOn(autoplay.key.to_string()));
            }
            if autoplay.after.is_zero() {
                return Err(ValidationError::ZeroDelay("autoplay delay"));
            }
        }
        Ok(())
    }
}
