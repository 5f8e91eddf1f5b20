//! Switch sequencer — the single owner of the board.
//!
//! The sequencer runs as one tokio task. Callers talk to it through a
//! cloneable [`SequencerHandle`]; timer tasks report back over the same
//! command channel. All board mutations therefore happen one at a time, in
//! the order the triggers arrive.
//!
//! Lifecycle: [`Sequencer::spawn`] applies the scenario (mount); the task
//! ends on [`SequencerHandle::shutdown`] or once every handle is dropped,
//! aborting all pending timers on the way out (unmount).

mod command;
mod timers;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use trilemma_domain::board::{Board, Outcome};
use trilemma_domain::error::TrilemmaError;
use trilemma_domain::event::Event;
use trilemma_domain::id::SwitchKey;
use trilemma_domain::scenario::Scenario;
use trilemma_domain::snapshot::BoardSnapshot;

use crate::ports::EventPublisher;

use command::Command;
use timers::TimerRegistry;

const COMMAND_CAPACITY: usize = 32;

/// Task state: the board, its scenario and the tasks behind its timers.
pub struct Sequencer<P> {
    board: Board,
    scenario: Scenario,
    publisher: P,
    timers: TimerRegistry,
    commands: mpsc::Receiver<Command>,
}

impl<P> Sequencer<P>
where
    P: EventPublisher + Send + Sync + 'static,
{
    /// Start the sequencer task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::Validation`] if `scenario` does not fit
    /// `board`.
    pub fn spawn(
        board: Board,
        scenario: Scenario,
        publisher: P,
    ) -> Result<(SequencerHandle, JoinHandle<()>), TrilemmaError> {
        scenario.validate(board.switches())?;
        let (sender, commands) = mpsc::channel(COMMAND_CAPACITY);
        let sequencer = Self {
            board,
            scenario,
            publisher,
            timers: TimerRegistry::new(sender.downgrade()),
            commands,
        };
        let task = tokio::spawn(sequencer.run());
        Ok((SequencerHandle { sender }, task))
    }

    async fn run(mut self) {
        tracing::info!(
            switches = self.board.switches().len(),
            initial_on = self.scenario.initial_on.len(),
            autoplay = self.scenario.autoplay.is_some(),
            "sequencer started"
        );
        match self.board.apply_scenario(&self.scenario) {
            Ok(outcome) => self.apply(outcome).await,
            Err(err) => tracing::warn!(%err, "scenario not applied"),
        }

        let mut shutdown_reply = None;
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Toggle { key, reply } => {
                    let result = self.toggle(&key).await;
                    let _ = reply.send(result);
                }
                Command::Advance { reply } => {
                    let outcome = self.board.advance();
                    if outcome.is_empty() {
                        tracing::debug!("advance with nothing pending");
                    }
                    self.apply(outcome).await;
                    let _ = reply.send(self.board.snapshot());
                }
                Command::Reset { reply } => {
                    let outcome = self.board.reset();
                    self.apply(outcome).await;
                    let _ = reply.send(self.board.snapshot());
                }
                Command::Restart { reply } => {
                    let result = match self.board.restart(&self.scenario) {
                        Ok(outcome) => {
                            self.apply(outcome).await;
                            Ok(self.board.snapshot())
                        }
                        Err(err) => Err(err),
                    };
                    let _ = reply.send(result);
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.board.snapshot());
                }
                Command::PendingTimers { reply } => {
                    let _ = reply.send(self.timers.len());
                }
                Command::TimerFired(ticket) => {
                    self.timers.fired(ticket);
                    let outcome = self.board.timer_fired(ticket);
                    if outcome.is_empty() {
                        tracing::debug!(%ticket, "stale timer ignored");
                    }
                    self.apply(outcome).await;
                }
                Command::Shutdown { reply } => {
                    shutdown_reply = Some(reply);
                    break;
                }
            }
        }

        self.timers.cancel_all();
        tracing::info!("sequencer stopped");
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }

    async fn toggle(&mut self, key: &SwitchKey) -> Result<BoardSnapshot, TrilemmaError> {
        let outcome = self.board.toggle(key).inspect_err(|err| {
            tracing::warn!(%key, %err, "toggle rejected");
        })?;
        self.apply(outcome).await;
        Ok(self.board.snapshot())
    }

    /// Carry out the timer effects, then publish the events with the
    /// resulting snapshot.
    async fn apply(&mut self, outcome: Outcome) {
        for effect in outcome.effects {
            self.timers.apply(effect);
        }
        if outcome.events.is_empty() {
            return;
        }

        let snapshot = self.board.snapshot();
        for kind in outcome.events {
            tracing::info!(event = %kind, conflict = snapshot.conflict, "board changed");
            let event = Event::new(kind, snapshot.clone());
            if let Err(err) = self.publisher.publish(event).await {
                tracing::warn!(%err, "failed to publish board event");
            }
        }
    }
}

/// Cloneable front door to a running [`Sequencer`].
#[derive(Clone)]
pub struct SequencerHandle {
    sender: mpsc::Sender<Command>,
}

impl SequencerHandle {
    /// Toggle the switch named `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::NotFound`] for an unknown key, or
    /// [`TrilemmaError::SequencerStopped`] once the task has exited.
    pub async fn toggle(&self, key: SwitchKey) -> Result<BoardSnapshot, TrilemmaError> {
        self.request(|reply| Command::Toggle { key, reply }).await?
    }

    /// Skip the pending delay, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::SequencerStopped`] once the task has exited.
    pub async fn advance(&self) -> Result<BoardSnapshot, TrilemmaError> {
        self.request(|reply| Command::Advance { reply }).await
    }

    /// Turn everything off and cancel all timers.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::SequencerStopped`] once the task has exited.
    pub async fn reset(&self) -> Result<BoardSnapshot, TrilemmaError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Reset, then replay the scenario the sequencer was started with.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::Validation`] if the scenario does not fit
    /// the board, leaving the board as it was. [`Sequencer::spawn`] already
    /// refuses such scenarios. Returns [`TrilemmaError::SequencerStopped`]
    /// once the task has exited.
    pub async fn restart(&self) -> Result<BoardSnapshot, TrilemmaError> {
        self.request(|reply| Command::Restart { reply }).await?
    }

    /// Current observable state.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::SequencerStopped`] once the task has exited.
    pub async fn snapshot(&self) -> Result<BoardSnapshot, TrilemmaError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Number of timer tasks currently sleeping.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::SequencerStopped`] once the task has exited.
    pub async fn pending_timers(&self) -> Result<usize, TrilemmaError> {
        self.request(|reply| Command::PendingTimers { reply }).await
    }

    /// Stop the task and abort every pending timer.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::SequencerStopped`] if the task had already
    /// exited.
    pub async fn shutdown(&self) -> Result<(), TrilemmaError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, TrilemmaError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| TrilemmaError::SequencerStopped)?;
        response.await.map_err(|_| TrilemmaError::SequencerStopped)
    }
}
