//! Timer tasks — one sleeping tokio task per pending [`TimerTicket`].

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use trilemma_domain::timer::{Effect, TimerKind, TimerTicket};

use super::command::Command;

/// Tracks the tasks behind the board's pending timers.
///
/// Timer tasks hold only a weak sender so that they never keep the
/// sequencer alive on their own. Dropping the registry aborts every task.
pub(crate) struct TimerRegistry {
    sender: mpsc::WeakSender<Command>,
    handles: HashMap<TimerTicket, JoinHandle<()>>,
}

impl TimerRegistry {
    pub(crate) fn new(sender: mpsc::WeakSender<Command>) -> Self {
        Self {
            sender,
            handles: HashMap::new(),
        }
    }

    pub(crate) fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Schedule {
                ticket,
                kind,
                after,
            } => self.schedule(ticket, &kind, after),
            Effect::Cancel { ticket } => self.cancel(ticket),
        }
    }

    /// Forget a ticket whose task has already delivered its fire.
    pub(crate) fn fired(&mut self, ticket: TimerTicket) {
        self.handles.remove(&ticket);
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    pub(crate) fn cancel_all(&mut self) {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        if count > 0 {
            tracing::debug!(count, "pending timers aborted");
        }
    }

    fn schedule(&mut self, ticket: TimerTicket, kind: &TimerKind, after: Duration) {
        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(Command::TimerFired(ticket)).await;
            }
        });
        tracing::debug!(
            %ticket,
            ?kind,
            delay_ms = u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
            "timer scheduled"
        );
        if let Some(previous) = self.handles.insert(ticket, handle) {
            previous.abort();
        }
    }

    fn cancel(&mut self, ticket: TimerTicket) {
        if let Some(handle) = self.handles.remove(&ticket) {
            handle.abort();
            tracing::debug!(%ticket, "timer cancelled");
        }
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
