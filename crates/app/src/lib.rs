//! # trilemma-app
//!
//! Application layer — the switch sequencer and its **port definitions**.
//!
//! ## Responsibilities
//! - Define the [`EventPublisher`](ports::EventPublisher) port the
//!   presentation layer subscribes through
//! - Run the [`Sequencer`](sequencer::Sequencer): a single task that owns
//!   the [`Board`](trilemma_domain::board::Board), executes its timer
//!   effects as cancellable tokio tasks and publishes every transition
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `trilemma-domain` only (plus `tokio` for tasks, channels and
//! timers). Never imports presentation code.

pub mod event_bus;
pub mod ports;
pub mod sequencer;
