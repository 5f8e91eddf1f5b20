//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `trilemma.toml` in the working directory, or at the path in
//! `TRILEMMA_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use trilemma_domain::board::Board;
use trilemma_domain::id::SwitchKey;
use trilemma_domain::scenario::{Autoplay, Scenario};
use trilemma_domain::switch::Switch;
use trilemma_domain::timer::Timings;

use crate::render::OutputFormat;

const DEFAULT_PATH: &str = "trilemma.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The three switches, in display order.
    pub switches: Vec<SwitchConfig>,
    /// Sequencer delays.
    pub timings: TimingsConfig,
    /// Scripted opening.
    pub scenario: ScenarioConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Presentation settings.
    pub display: DisplayConfig,
}

/// One `[[switches]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchConfig {
    pub key: String,
    pub label: String,
}

/// Delays in milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub activation_delay_ms: u64,
    pub drop_delay_ms: u64,
}

/// Switches on at start and the optional scripted toggle.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub initial_on: Vec<String>,
    /// Switch toggled by the script; `"off"` disables it.
    pub autoplay_key: Option<String>,
    pub autoplay_delay_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Presentation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub output: OutputFormat,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration does not describe a valid board.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("TRILEMMA_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(ms) = var("TRILEMMA_ACTIVATION_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.timings.activation_delay_ms = ms;
        }
        if let Some(ms) = var("TRILEMMA_DROP_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.timings.drop_delay_ms = ms;
        }
        if let Some(val) = var("TRILEMMA_AUTOPLAY") {
            self.scenario.autoplay_key = Some(val.trim().to_string());
        }
        if let Some(val) = var("TRILEMMA_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let board = self.board()?;
        self.scenario()?
            .validate(board.switches())
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }

    /// Build the board described by `[[switches]]` and `[timings]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a bad key, an empty label, a
    /// zero delay or a switch count other than three.
    pub fn board(&self) -> Result<Board, ConfigError> {
        let switches = self
            .switches
            .iter()
            .map(|s| Switch::new(SwitchKey::new(s.key.as_str())?, s.label.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        let timings = Timings::new(
            Duration::from_millis(self.timings.activation_delay_ms),
            Duration::from_millis(self.timings.drop_delay_ms),
        )
        .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Board::new(switches, timings).map_err(|err| ConfigError::Validation(err.to_string()))
    }

    /// Build the scenario described by `[scenario]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a listed key is malformed.
    pub fn scenario(&self) -> Result<Scenario, ConfigError> {
        let parse = |raw: &str| {
            SwitchKey::new(raw).map_err(|err| ConfigError::Validation(err.to_string()))
        };
        let initial_on = self
            .scenario
            .initial_on
            .iter()
            .map(|raw| parse(raw.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let autoplay = self
            .scenario
            .autoplay_key
            .as_deref()
            .filter(|raw| !matches!(*raw, "" | "off"))
            .map(|raw| {
                Ok::<_, ConfigError>(Autoplay {
                    key: parse(raw)?,
                    after: Duration::from_millis(self.scenario.autoplay_delay_ms),
                })
            })
            .transpose()?;
        Ok(Scenario {
            initial_on,
            autoplay,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            switches: vec![
                SwitchConfig {
                    key: "speed".to_string(),
                    label: "Fast Delivery".to_string(),
                },
                SwitchConfig {
                    key: "maintainability".to_string(),
                    label: "Maintainable".to_string(),
                },
                SwitchConfig {
                    key: "cost".to_string(),
                    label: "Low Cost".to_string(),
                },
            ],
            timings: TimingsConfig::default(),
            scenario: ScenarioConfig::default(),
            logging: LoggingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: 1200,
            drop_delay_ms: 15_000,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            initial_on: vec!["maintainability".to_string(), "cost".to_string()],
            autoplay_key: Some("speed".to_string()),
            autoplay_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "trilemma=info,trilemma_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
