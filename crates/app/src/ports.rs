//! Port definitions — traits that adapters implement.
//!
//! The sequencer only knows how to hand events to an [`EventPublisher`];
//! whoever renders the board subscribes on the other side.

pub mod event_bus;

pub use event_bus::EventPublisher;
