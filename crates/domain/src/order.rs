//! Activation order — FIFO of the switches that are currently on.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::id::SwitchKey;

/// Keys of the on switches, oldest first.
///
/// Each key appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationOrder(VecDeque<SwitchKey>);

impl ActivationOrder {
    /// Append `key` unless it is already present. Returns whether it was added.
    pub fn push(&mut self, key: SwitchKey) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.0.push_back(key);
        true
    }

    /// Remove `key` wherever it sits. Returns whether it was present.
    pub fn remove(&mut self, key: &SwitchKey) -> bool {
        match self.0.iter().position(|k| k == key) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove and return the earliest-activated key.
    pub fn pop_front(&mut self) -> Option<SwitchKey> {
        self.0.pop_front()
    }

    /// The earliest-activated key.
    #[must_use]
    pub fn front(&self) -> Option<&SwitchKey> {
        self.0.front()
    }

    /// The most recently activated key.
    #[must_use]
    pub fn back(&self) -> Option<&SwitchKey> {
        self.0.back()
    }

    #[must_use]
    pub fn contains(&self, key: &SwitchKey) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwitchKey> {
        self.0.iter()
    }

    /// Copy the keys out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<SwitchKey> {
        self.0.iter().cloned().collect()
    }
}
