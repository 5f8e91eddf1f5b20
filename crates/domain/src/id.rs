//! Identifier newtypes: stable switch keys and random event ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Stable, human-readable key naming a switch (e.g. `speed`).
///
/// Keys are non-empty and limited to lowercase ASCII letters, digits,
/// `_` and `-`, so they can double as keyboard commands and config keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SwitchKey(String);

impl SwitchKey {
    /// Validate and wrap a key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidKey`] when `raw` is empty or contains
    /// a character outside `[a-z0-9_-]`.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
        if valid {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidKey(raw))
        }
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwitchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SwitchKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SwitchKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SwitchKey> for String {
    fn from(key: SwitchKey) -> Self {
        key.0
    }
}

impl AsRef<str> for SwitchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for an [`Event`](crate::event::Event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl EventId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_lowercase_key() {
        let key = SwitchKey::new("low_cost-2").unwrap();
        assert_eq!(key.as_str(), "low_cost-2");
    }

    #[test]
    fn should_reject_empty_key() {
        assert_eq!(
            SwitchKey::new(""),
            Err(ValidationError::InvalidKey(String::new()))
        );
    }

    #[test]
    fn should_reject_uppercase_and_spaces() {
        assert!(SwitchKey::new("Speed").is_err());
        assert!(SwitchKey::new("low cost").is_err());
    }

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let key: SwitchKey = "cost".parse().unwrap();
        assert_eq!(key.to_string(), "cost");
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let key = SwitchKey::new("speed").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"speed\"");
    }

    #[test]
    fn should_reject_invalid_key_when_deserializing() {
        let result: Result<SwitchKey, _> = serde_json::from_str("\"NOPE\"");
        assert!(result.is_err());
    }

    #[test]
    fn should_generate_unique_event_ids() {
        assert_ne!(EventId::new(), EventId::new());
    }
}
