//! # trilemma
//!
//! Terminal front end for the switch sequencer.
//!
//! ## Responsibilities
//! - Load configuration (`trilemma.toml` plus environment overrides)
//! - Parse keyboard commands and forward them to the sequencer
//! - Render every published board event as text or JSON
//!
//! The `trilemma` binary wires these together; they live in a library so
//! the end-to-end tests can drive them without a terminal.

pub mod config;
pub mod input;
pub mod render;
pub mod session;
