//! # trilemma-domain
//!
//! Pure domain model for the trilemma switch board.
//!
//! ## Responsibilities
//! - Foundational types: switch keys, event ids, error conventions
//! - Define **Switches** (labeled toggles with an off / turning-on / on phase)
//! - Define the **Activation order** (which switch drops first)
//! - Define the **Board** state machine: toggles, forced activation,
//!   conflict, drop, advance and reset
//! - Express delays as **timer effects** instead of sleeping
//! - Define **Snapshots** (what the presentation layer observes) and
//!   **Events** (transition records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! The runtime that turns timer effects into real delays lives in `app`.

pub mod error;
pub mod id;

pub mod board;
pub mod event;
pub mod order;
pub mod scenario;
pub mod snapshot;
pub mod switch;
pub mod timer;
