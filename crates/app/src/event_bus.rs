//! Fan-out of board events to the renderer and any other observers.
//!
//! Every [`Event`] carries the board snapshot taken after the operation
//! that produced it, so a subscriber can redraw from the event alone.

use std::future::Future;

use tokio::sync::broadcast;

use trilemma_domain::error::TrilemmaError;
use trilemma_domain::event::Event;

use crate::ports::EventPublisher;

/// Sequencer events over a [`broadcast`] channel.
///
/// A board with no one watching still runs: events published without a
/// subscriber are discarded. A subscriber that falls more than `capacity`
/// events behind skips the oldest ones. Clones publish on the same channel.
#[derive(Clone)]
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), TrilemmaError>> + Send {
        // Only fails with zero receivers.
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}
