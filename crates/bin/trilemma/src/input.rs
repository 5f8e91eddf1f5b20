//! Keyboard commands, one per line.
//!
//! | Input                          | Command           |
//! |--------------------------------|-------------------|
//! | `1`, `2`, `3` or a switch key  | toggle            |
//! | `n`, `next`, `a`, `advance`, empty | advance       |
//! | `r`, `reset`                   | reset             |
//! | `s`, `restart`                 | restart scenario  |
//! | `p`, `print`                   | print the board   |
//! | `q`, `quit`, `exit`            | shut down         |
//!
//! Command words win over switch keys of the same spelling.

use trilemma_domain::id::SwitchKey;

/// One-line reminder printed at start.
pub const HELP: &str =
    "keys: 1-3 toggle, enter advance, r reset, s restart, p print, q quit";

/// A parsed keyboard command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Toggle(SwitchKey),
    Advance,
    Reset,
    Restart,
    Print,
    Quit,
}

/// Input that does not name a command or a switch.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("there is no switch {0}")]
    NoSuchPosition(usize),
    #[error("unknown command: {0}")]
    Unknown(String),
}

impl Input {
    /// Parse one line against the board's switch keys, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when the line matches neither a command, a
    /// switch position nor a switch key.
    pub fn parse(line: &str, keys: &[SwitchKey]) -> Result<Self, InputError> {
        let word = line.trim().to_ascii_lowercase();
        match word.as_str() {
            "" | "n" | "next" | "a" | "advance" => Ok(Self::Advance),
            "r" | "reset" => Ok(Self::Reset),
            "s" | "restart" => Ok(Self::Restart),
            "p" | "print" => Ok(Self::Print),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => match other.parse::<usize>() {
                Ok(position) => position
                    .checked_sub(1)
                    .and_then(|idx| keys.get(idx))
                    .map(|key| Self::Toggle(key.clone()))
                    .ok_or(InputError::NoSuchPosition(position)),
                Err(_) => keys
                    .iter()
                    .find(|key| key.as_str() == other)
                    .map(|key| Self::Toggle(key.clone()))
                    .ok_or_else(|| InputError::Unknown(line.trim().to_string())),
            },
        }
    }
}
