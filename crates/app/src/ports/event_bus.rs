//! Event bus port — publish/subscribe for board events.

use std::future::Future;

use trilemma_domain::error::TrilemmaError;
use trilemma_domain::event::Event;

/// Publishes board events to interested observers (the presentation layer).
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), TrilemmaError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), TrilemmaError>> + Send {
        (**self).publish(event)
    }
}
