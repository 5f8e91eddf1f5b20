//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`TrilemmaError`] via `#[from]`.

/// Top-level error for board construction and sequencer operations.
#[derive(Debug, thiserror::Error)]
pub enum TrilemmaError {
    /// A referenced switch does not exist on the board.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A domain invariant was violated while building a value.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The sequencer task has exited and can no longer take commands.
    #[error("sequencer stopped")]
    SequencerStopped,
}

/// A lookup by key found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {key} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Switch"`).
    pub entity: &'static str,
    /// The key that was requested.
    pub key: String,
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A switch key is empty or contains characters outside `[a-z0-9_-]`.
    #[error("invalid switch key {0:?}")]
    InvalidKey(String),

    /// The same key was used for two switches, or twice in a list.
    #[error("duplicate switch key {0}")]
    DuplicateKey(String),

    /// A board must hold exactly three switches.
    #[error("a board needs exactly {expected} switches, got {actual}")]
    WrongSwitchCount {
        /// Required number of switches.
        expected: usize,
        /// Number that was supplied.
        actual: usize,
    },

    /// A switch label is empty or whitespace.
    #[error("switch {0} has an empty label")]
    EmptyLabel(String),

    /// A scenario may start with at most two switches on.
    #[error("a scenario may turn on at most {max} switches initially, got {actual}")]
    TooManyInitial {
        /// Allowed maximum.
        max: usize,
        /// Number that was supplied.
        actual: usize,
    },

    /// A scenario references a key that is not on the board.
    #[error("scenario references unknown switch {0}")]
    UnknownScenarioKey(String),

    /// The scripted toggle targets a switch the scenario already turns on.
    #[error("autoplay switch {0} is already on at start")]
    AutoplayAlreadyOn(String),

    /// A delay was configured as zero.
    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),
}
