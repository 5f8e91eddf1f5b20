//! Board — the switch sequencing state machine.
//!
//! The board owns the three switches, their activation order, the forcing
//! reference and the conflict flag. Every operation mutates the board
//! synchronously and returns an [`Outcome`]: the [`EventKind`]s describing
//! what changed and the timer [`Effect`]s the runtime must carry out.
//!
//! ```text
//!            toggle (<2 on)                 toggle (2 on)
//!   Off ───────────────────────▶ On   Off ───────────────▶ TurningOn
//!    ▲                            │                          │
//!    │ toggle / drop              │       activation fires   │
//!    └────────────────────────────┘   or advance ────────────┴──▶ On + conflict
//! ```

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{NotFoundError, TrilemmaError, ValidationError};
use crate::event::{EventKind, TurnOffCause};
use crate::id::SwitchKey;
use crate::order::ActivationOrder;
use crate::scenario::Scenario;
use crate::snapshot::{BoardSnapshot, SwitchView};
use crate::switch::{Switch, SwitchPhase};
use crate::timer::{Effect, PendingTimer, TimerKind, TimerTicket, Timings};

/// Number of switches on a board.
pub const SWITCH_COUNT: usize = 3;

/// Result of one board operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub events: Vec<EventKind>,
    pub effects: Vec<Effect>,
}

impl Outcome {
    /// `true` when the operation changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }

    /// Append `other` after the events and effects already collected.
    pub fn extend(&mut self, other: Outcome) {
        self.events.extend(other.events);
        self.effects.extend(other.effects);
    }
}

/// The three trade-off switches and the rules that govern them.
#[derive(Debug, Clone)]
pub struct Board {
    switches: Vec<Switch>,
    order: ActivationOrder,
    forcing: Option<SwitchKey>,
    conflict: bool,
    dropped: Option<SwitchKey>,
    activation_timer: Option<PendingTimer>,
    drop_timer: Option<PendingTimer>,
    autoplay_timer: Option<PendingTimer>,
    timings: Timings,
    next_ticket: u64,
}

impl Board {
    /// Create a board with every switch off.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WrongSwitchCount`] unless exactly
    /// [`SWITCH_COUNT`] switches are given, or
    /// [`ValidationError::DuplicateKey`] if two switches share a key.
    pub fn new(switches: Vec<Switch>, timings: Timings) -> Result<Self, ValidationError> {
        if switches.len() != SWITCH_COUNT {
            return Err(ValidationError::WrongSwitchCount {
                expected: SWITCH_COUNT,
                actual: switches.len(),
            });
        }
        let mut seen = HashSet::new();
        for switch in &switches {
            if !seen.insert(&switch.key) {
                return Err(ValidationError::DuplicateKey(switch.key.to_string()));
            }
        }

        let switches = switches
            .into_iter()
            .map(|mut switch| {
                switch.phase = SwitchPhase::Off;
                switch
            })
            .collect();

        Ok(Self {
            switches,
            order: ActivationOrder::default(),
            forcing: None,
            conflict: false,
            dropped: None,
            activation_timer: None,
            drop_timer: None,
            autoplay_timer: None,
            timings,
            next_ticket: 0,
        })
    }

    #[must_use]
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    #[must_use]
    pub fn switch(&self, key: &SwitchKey) -> Option<&Switch> {
        self.switches.iter().find(|s| &s.key == key)
    }

    #[must_use]
    pub fn order(&self) -> &ActivationOrder {
        &self.order
    }

    /// The switch currently being forced on, if any.
    #[must_use]
    pub fn forcing(&self) -> Option<&SwitchKey> {
        self.forcing.as_ref()
    }

    /// Whether all three switches are on.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.conflict
    }

    /// The switch that will drop when the conflict resolves.
    #[must_use]
    pub fn drop_target(&self) -> Option<&SwitchKey> {
        if self.conflict {
            self.order.front()
        } else {
            None
        }
    }

    #[must_use]
    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Timers the board is waiting on.
    pub fn pending_timers(&self) -> impl Iterator<Item = &PendingTimer> {
        [
            self.activation_timer.as_ref(),
            self.drop_timer.as_ref(),
            self.autoplay_timer.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Handle a toggle request from the user.
    ///
    /// An off switch turns on at once while fewer than two are on, and is
    /// forced on after [`Timings::activation_delay`] otherwise. An on switch
    /// turns off and cancels every pending timer. Toggling a switch that is
    /// still turning on is ignored. Any accepted toggle cancels a pending
    /// scripted step.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::NotFound`] when `key` is not on the board.
    pub fn toggle(&mut self, key: &SwitchKey) -> Result<Outcome, TrilemmaError> {
        let idx = self.index_of(key)?;
        let mut out = Outcome::default();
        if self.switches[idx].phase == SwitchPhase::TurningOn {
            out.events.push(EventKind::ToggleIgnored { key: key.clone() });
            return Ok(out);
        }
        self.cancel_autoplay(&mut out);
        self.toggle_at(idx, &mut out);
        Ok(out)
    }

    /// Skip the current wait.
    ///
    /// Completes a pending forced activation, otherwise drops the oldest
    /// switch of an active conflict, otherwise runs a pending scripted step
    /// at once (including the forced activation it would start). Does
    /// nothing when no delay is pending.
    pub fn advance(&mut self) -> Outcome {
        let mut out = Outcome::default();
        if Self::cancel(&mut self.activation_timer, &mut out).is_some() {
            self.complete_forcing(&mut out);
        } else if self.conflict {
            Self::cancel(&mut self.drop_timer, &mut out);
            self.perform_drop(&mut out);
        } else if let Some(timer) = Self::cancel(&mut self.autoplay_timer, &mut out) {
            self.run_autoplay(timer, &mut out);
            if Self::cancel(&mut self.activation_timer, &mut out).is_some() {
                self.complete_forcing(&mut out);
            }
        }
        out
    }

    /// Cancel all timers and turn every switch off.
    pub fn reset(&mut self) -> Outcome {
        let mut out = Outcome::default();
        Self::cancel(&mut self.activation_timer, &mut out);
        Self::cancel(&mut self.drop_timer, &mut out);
        Self::cancel(&mut self.autoplay_timer, &mut out);
        for switch in &mut self.switches {
            switch.phase = SwitchPhase::Off;
        }
        self.order.clear();
        self.forcing = None;
        self.conflict = false;
        self.dropped = None;
        out.events.push(EventKind::BoardReset);
        out
    }

    /// React to a timer the runtime scheduled earlier.
    ///
    /// Tickets that are no longer pending (cancelled, or already skipped
    /// by [`advance`](Self::advance)) are ignored.
    pub fn timer_fired(&mut self, ticket: TimerTicket) -> Outcome {
        let mut out = Outcome::default();
        if self
            .activation_timer
            .take_if(|t| t.ticket == ticket)
            .is_some()
        {
            self.complete_forcing(&mut out);
        } else if self.drop_timer.take_if(|t| t.ticket == ticket).is_some() {
            self.perform_drop(&mut out);
        } else if let Some(timer) = self.autoplay_timer.take_if(|t| t.ticket == ticket) {
            self.run_autoplay(timer, &mut out);
        }
        out
    }

    /// Turn on the scenario's initial switches and schedule its scripted step.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::Validation`] when the scenario does not fit
    /// this board.
    pub fn apply_scenario(&mut self, scenario: &Scenario) -> Result<Outcome, TrilemmaError> {
        scenario.validate(&self.switches)?;
        let mut out = Outcome::default();
        for key in &scenario.initial_on {
            let idx = self.index_of(key)?;
            if self.switches[idx].phase == SwitchPhase::Off {
                self.request_on(idx, &mut out);
            }
        }
        if let Some(autoplay) = &scenario.autoplay {
            Self::cancel(&mut self.autoplay_timer, &mut out);
            let kind = TimerKind::Autoplay {
                key: autoplay.key.clone(),
            };
            self.autoplay_timer = Some(self.schedule(kind, autoplay.after, &mut out));
            out.events.push(EventKind::AutoplayScheduled {
                key: autoplay.key.clone(),
            });
        }
        Ok(out)
    }

    /// [`reset`](Self::reset), then [`apply_scenario`](Self::apply_scenario).
    ///
    /// The board is left untouched if the scenario is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`TrilemmaError::Validation`] when the scenario does not fit
    /// this board.
    pub fn restart(&mut self, scenario: &Scenario) -> Result<Outcome, TrilemmaError> {
        scenario.validate(&self.switches)?;
        let mut out = self.reset();
        out.extend(self.apply_scenario(scenario)?);
        Ok(out)
    }

    /// Observable state, with the animation flags derived.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let forcing_pending = self.forcing.is_some();
        let newest = self.order.back();
        let drop_target = self.drop_target();

        let switches = self
            .switches
            .iter()
            .map(|switch| {
                let on = switch.is_on();
                let older = newest != Some(&switch.key);
                SwitchView {
                    key: switch.key.clone(),
                    label: switch.label.clone(),
                    phase: switch.phase,
                    on,
                    shake: on && (forcing_pending || (self.conflict && older)),
                    shake_strong: drop_target == Some(&switch.key),
                    falling: self.dropped.as_ref() == Some(&switch.key),
                }
            })
            .collect();

        BoardSnapshot {
            switches,
            order: self.order.to_vec(),
            forcing: self.forcing.clone(),
            conflict: self.conflict,
        }
    }

    fn index_of(&self, key: &SwitchKey) -> Result<usize, NotFoundError> {
        self.switches
            .iter()
            .position(|s| &s.key == key)
            .ok_or_else(|| NotFoundError {
                entity: "Switch",
                key: key.to_string(),
            })
    }

    fn on_count(&self) -> usize {
        self.switches.iter().filter(|s| s.is_on()).count()
    }

    fn toggle_at(&mut self, idx: usize, out: &mut Outcome) {
        match self.switches[idx].phase {
            SwitchPhase::Off => self.request_on(idx, out),
            SwitchPhase::On => self.turn_off_manually(idx, out),
            SwitchPhase::TurningOn => out.events.push(EventKind::ToggleIgnored {
                key: self.switches[idx].key.clone(),
            }),
        }
    }

    fn request_on(&mut self, idx: usize, out: &mut Outcome) {
        let key = self.switches[idx].key.clone();
        if self.forcing.is_some() {
            out.events.push(EventKind::ToggleIgnored { key });
            return;
        }
        self.dropped = None;

        if self.on_count() < SWITCH_COUNT - 1 {
            self.switches[idx].phase = SwitchPhase::On;
            self.order.push(key.clone());
            out.events.push(EventKind::TurnedOn { key });
            return;
        }

        self.switches[idx].phase = SwitchPhase::TurningOn;
        self.forcing = Some(key.clone());
        let kind = TimerKind::Activation { key: key.clone() };
        self.activation_timer = Some(self.schedule(kind, self.timings.activation_delay, out));
        out.events.push(EventKind::ForcingStarted { key });
    }

    fn turn_off_manually(&mut self, idx: usize, out: &mut Outcome) {
        self.abort_forcing(out);
        Self::cancel(&mut self.drop_timer, out);
        self.cancel_autoplay(out);
        self.dropped = None;

        let switch = &mut self.switches[idx];
        switch.phase = SwitchPhase::Off;
        let key = switch.key.clone();
        self.order.remove(&key);
        out.events.push(EventKind::TurnedOff {
            key,
            cause: TurnOffCause::Manual,
        });
        self.clear_conflict(out);
    }

    fn complete_forcing(&mut self, out: &mut Outcome) {
        let Some(key) = self.forcing.take() else {
            return;
        };
        if let Some(switch) = self.switches.iter_mut().find(|s| s.key == key) {
            switch.phase = SwitchPhase::On;
        }
        self.order.push(key.clone());
        out.events.push(EventKind::ForcingCompleted { key });

        self.conflict = true;
        out.events.push(EventKind::ConflictStarted);
        Self::cancel(&mut self.drop_timer, out);
        self.drop_timer = Some(self.schedule(TimerKind::Drop, self.timings.drop_delay, out));
    }

    fn perform_drop(&mut self, out: &mut Outcome) {
        if let Some(key) = self.order.pop_front() {
            if let Some(switch) = self.switches.iter_mut().find(|s| s.key == key) {
                switch.phase = SwitchPhase::Off;
            }
            self.dropped = Some(key.clone());
            out.events.push(EventKind::TurnedOff {
                key,
                cause: TurnOffCause::Dropped,
            });
        }
        self.clear_conflict(out);
    }

    fn run_autoplay(&mut self, timer: PendingTimer, out: &mut Outcome) {
        let TimerKind::Autoplay { key } = timer.kind else {
            return;
        };
        if let Ok(idx) = self.index_of(&key) {
            self.toggle_at(idx, out);
        }
    }

    fn abort_forcing(&mut self, out: &mut Outcome) {
        Self::cancel(&mut self.activation_timer, out);
        if let Some(key) = self.forcing.take() {
            if let Some(switch) = self.switches.iter_mut().find(|s| s.key == key) {
                switch.phase = SwitchPhase::Off;
            }
            out.events.push(EventKind::ForcingCancelled { key });
        }
    }

    fn cancel_autoplay(&mut self, out: &mut Outcome) {
        if let Some(timer) = Self::cancel(&mut self.autoplay_timer, out)
            && let TimerKind::Autoplay { key } = timer.kind
        {
            out.events.push(EventKind::AutoplayCancelled { key });
        }
    }

    fn clear_conflict(&mut self, out: &mut Outcome) {
        if self.conflict {
            self.conflict = false;
            out.events.push(EventKind::ConflictCleared);
        }
    }

    fn schedule(&mut self, kind: TimerKind, after: Duration, out: &mut Outcome) -> PendingTimer {
        let ticket = TimerTicket(self.next_ticket);
        self.next_ticket += 1;
        out.effects.push(Effect::Schedule {
            ticket,
            kind: kind.clone(),
            after,
        });
        PendingTimer { ticket, kind }
    }

    fn cancel(slot: &mut Option<PendingTimer>, out: &mut Outcome) -> Option<PendingTimer> {
        let timer = slot.take()?;
        out.effects.push(Effect::Cancel {
            ticket: timer.ticket,
        });
        Some(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Autoplay;

    fn key(raw: &str) -> SwitchKey {
        SwitchKey::new(raw).unwrap()
    }

    fn board() -> Board {
        let switches = ["a", "b", "c"]
            .into_iter()
            .map(|k| Switch::new(key(k), k.to_uppercase()).unwrap())
            .collect();
        Board::new(switches, Timings::default()).unwrap()
    }

    fn scheduled(out: &Outcome) -> Vec<(TimerTicket, TimerKind, Duration)> {
        out.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Schedule {
                    ticket,
                    kind,
                    after,
                } => Some((*ticket, kind.clone(), *after)),
                Effect::Cancel { .. } => None,
            })
            .collect()
    }

    fn cancelled(out: &Outcome) -> Vec<TimerTicket> {
        out.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Cancel { ticket } => Some(*ticket),
                Effect::Schedule { .. } => None,
            })
            .collect()
    }

    fn phase(board: &Board, raw: &str) -> SwitchPhase {
        board.switch(&key(raw)).unwrap().phase
    }

    /// a and b on, c forced: returns the activation ticket.
    fn force_third(board: &mut Board) -> TimerTicket {
        board.toggle(&key("a")).unwrap();
        board.toggle(&key("b")).unwrap();
        let out = board.toggle(&key("c")).unwrap();
        scheduled(&out)[0].0
    }

    /// a, b, c on with a conflict: returns the drop ticket.
    fn reach_conflict(board: &mut Board) -> TimerTicket {
        let activation = force_third(board);
        let out = board.timer_fired(activation);
        scheduled(&out)[0].0
    }

    // ── Construction ──────────────────────────────────────────────

    #[test]
    fn should_reject_wrong_switch_count() {
        let switches = vec![Switch::new(key("a"), "A").unwrap()];
        let result = Board::new(switches, Timings::default());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::WrongSwitchCount {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn should_reject_duplicate_keys() {
        let switches = ["a", "b", "a"]
            .into_iter()
            .map(|k| Switch::new(key(k), k).unwrap())
            .collect();
        let result = Board::new(switches, Timings::default());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::DuplicateKey("a".to_string())
        );
    }

    #[test]
    fn should_start_with_everything_off() {
        let board = board();
        assert!(board.switches().iter().all(|s| s.phase == SwitchPhase::Off));
        assert!(board.order().is_empty());
        assert!(!board.is_conflict());
        assert_eq!(board.pending_timers().count(), 0);
    }

    // ── Toggle ────────────────────────────────────────────────────

    #[test]
    fn should_turn_on_immediately_when_fewer_than_two_are_on() {
        let mut board = board();
        let out = board.toggle(&key("a")).unwrap();
        assert_eq!(out.events, vec![EventKind::TurnedOn { key: key("a") }]);
        assert!(out.effects.is_empty());

        board.toggle(&key("b")).unwrap();
        assert_eq!(phase(&board, "b"), SwitchPhase::On);
        assert_eq!(board.order().to_vec(), vec![key("a"), key("b")]);
    }

    #[test]
    fn should_start_forcing_when_two_are_already_on() {
        let mut board = board();
        board.toggle(&key("a")).unwrap();
        board.toggle(&key("b")).unwrap();

        let out = board.toggle(&key("c")).unwrap();

        assert_eq!(phase(&board, "c"), SwitchPhase::TurningOn);
        assert_eq!(board.forcing(), Some(&key("c")));
        assert!(!board.order().contains(&key("c")));
        assert!(!board.is_conflict());
        let timers = scheduled(&out);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].1, TimerKind::Activation { key: key("c") });
        assert_eq!(timers[0].2, Duration::from_millis(1200));
    }

    #[test]
    fn should_ignore_toggle_while_turning_on() {
        let mut board = board();
        force_third(&mut board);

        let out = board.toggle(&key("c")).unwrap();

        assert_eq!(out.events, vec![EventKind::ToggleIgnored { key: key("c") }]);
        assert!(out.effects.is_empty());
        assert_eq!(phase(&board, "c"), SwitchPhase::TurningOn);
    }

    #[test]
    fn should_return_not_found_for_unknown_key() {
        let mut board = board();
        let result = board.toggle(&key("zzz"));
        assert!(matches!(result, Err(TrilemmaError::NotFound(_))));
    }

    #[test]
    fn should_turn_off_and_leave_order() {
        let mut board = board();
        board.toggle(&key("a")).unwrap();
        board.toggle(&key("b")).unwrap();

        let out = board.toggle(&key("a")).unwrap();

        assert_eq!(
            out.events,
            vec![EventKind::TurnedOff {
                key: key("a"),
                cause: TurnOffCause::Manual
            }]
        );
        assert_eq!(board.order().to_vec(), vec![key("b")]);
    }

    // ── Forced activation ─────────────────────────────────────────

    #[test]
    fn should_complete_forcing_when_activation_timer_fires() {
        let mut board = board();
        let ticket = force_third(&mut board);

        let out = board.timer_fired(ticket);

        assert_eq!(phase(&board, "c"), SwitchPhase::On);
        assert_eq!(board.forcing(), None);
        assert!(board.is_conflict());
        assert_eq!(board.order().to_vec(), vec![key("a"), key("b"), key("c")]);
        assert_eq!(board.drop_target(), Some(&key("a")));
        let timers = scheduled(&out);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].1, TimerKind::Drop);
        assert_eq!(timers[0].2, Duration::from_secs(15));
    }

    #[test]
    fn should_drop_oldest_when_drop_timer_fires() {
        let mut board = board();
        let ticket = reach_conflict(&mut board);

        let out = board.timer_fired(ticket);

        assert_eq!(phase(&board, "a"), SwitchPhase::Off);
        assert!(!board.is_conflict());
        assert_eq!(board.order().to_vec(), vec![key("b"), key("c")]);
        assert_eq!(
            out.events,
            vec![
                EventKind::TurnedOff {
                    key: key("a"),
                    cause: TurnOffCause::Dropped
                },
                EventKind::ConflictCleared,
            ]
        );
        assert_eq!(board.pending_timers().count(), 0);
    }

    // ── Advance ───────────────────────────────────────────────────

    #[test]
    fn should_complete_forcing_immediately_on_advance() {
        let mut board = board();
        let activation = force_third(&mut board);

        let out = board.advance();

        assert_eq!(cancelled(&out), vec![activation]);
        assert!(board.is_conflict());
        assert_eq!(phase(&board, "c"), SwitchPhase::On);
        assert_eq!(scheduled(&out)[0].1, TimerKind::Drop);
    }

    #[test]
    fn should_drop_immediately_on_advance_during_conflict() {
        let mut board = board();
        let drop = reach_conflict(&mut board);

        let out = board.advance();

        assert_eq!(cancelled(&out), vec![drop]);
        assert!(scheduled(&out).is_empty());
        assert_eq!(phase(&board, "a"), SwitchPhase::Off);
        assert!(!board.is_conflict());
    }

    #[test]
    fn should_do_nothing_on_advance_when_nothing_is_pending() {
        let mut board = board();
        board.toggle(&key("a")).unwrap();
        board.toggle(&key("b")).unwrap();

        let out = board.advance();

        assert!(out.is_empty());
        assert_eq!(board.order().len(), 2);
    }

    // ── Manual override ───────────────────────────────────────────

    #[test]
    fn should_cancel_forcing_on_manual_turn_off() {
        let mut board = board();
        let activation = force_third(&mut board);

        let out = board.toggle(&key("b")).unwrap();

        assert_eq!(cancelled(&out), vec![activation]);
        assert_eq!(phase(&board, "c"), SwitchPhase::Off);
        assert_eq!(phase(&board, "b"), SwitchPhase::Off);
        assert_eq!(board.forcing(), None);
        assert_eq!(board.order().to_vec(), vec![key("a")]);
        assert_eq!(board.pending_timers().count(), 0);
    }

    #[test]
    fn should_cancel_drop_and_clear_conflict_on_manual_turn_off() {
        let mut board = board();
        let drop = reach_conflict(&mut board);

        let out = board.toggle(&key("c")).unwrap();

        assert_eq!(cancelled(&out), vec![drop]);
        assert!(!board.is_conflict());
        assert!(out.events.contains(&EventKind::ConflictCleared));
        assert_eq!(board.order().to_vec(), vec![key("a"), key("b")]);
        assert_eq!(board.pending_timers().count(), 0);
    }

    #[test]
    fn should_ignore_stale_timer_after_cancellation() {
        let mut board = board();
        let activation = force_third(&mut board);
        board.toggle(&key("a")).unwrap();

        let out = board.timer_fired(activation);

        assert!(out.is_empty());
        assert_eq!(phase(&board, "c"), SwitchPhase::Off);
        assert!(!board.is_conflict());
    }

    #[test]
    fn should_ignore_drop_ticket_already_skipped_by_advance() {
        let mut board = board();
        let drop = reach_conflict(&mut board);
        board.advance();

        let out = board.timer_fired(drop);

        assert!(out.is_empty());
        assert_eq!(board.order().to_vec(), vec![key("b"), key("c")]);
    }

    // ── Reset ─────────────────────────────────────────────────────

    #[test]
    fn should_reset_everything_from_conflict() {
        let mut board = board();
        let drop = reach_conflict(&mut board);

        let out = board.reset();

        assert_eq!(cancelled(&out), vec![drop]);
        assert_eq!(out.events, vec![EventKind::BoardReset]);
        assert!(board.switches().iter().all(|s| s.phase == SwitchPhase::Off));
        assert!(board.order().is_empty());
        assert!(!board.is_conflict());
        assert_eq!(board.forcing(), None);
        assert_eq!(board.pending_timers().count(), 0);
    }

    #[test]
    fn should_reset_during_forcing() {
        let mut board = board();
        let activation = force_third(&mut board);

        let out = board.reset();

        assert_eq!(cancelled(&out), vec![activation]);
        assert_eq!(phase(&board, "c"), SwitchPhase::Off);
        assert_eq!(board.forcing(), None);
    }

    #[test]
    fn should_never_reuse_tickets() {
        let mut board = board();
        let first = force_third(&mut board);
        board.reset();
        let second = force_third(&mut board);
        assert_ne!(first, second);
    }

    // ── Snapshot flags ────────────────────────────────────────────

    #[test]
    fn should_shake_on_switches_while_forcing() {
        let mut board = board();
        force_third(&mut board);

        let snap = board.snapshot();

        assert!(snap.switch(&key("a")).unwrap().shake);
        assert!(snap.switch(&key("b")).unwrap().shake);
        assert!(!snap.switch(&key("c")).unwrap().shake);
        assert!(!snap.conflict);
        assert_eq!(snap.forcing, Some(key("c")));
    }

    #[test]
    fn should_flag_older_switches_and_drop_target_during_conflict() {
        let mut board = board();
        reach_conflict(&mut board);

        let snap = board.snapshot();
        let a = snap.switch(&key("a")).unwrap();
        let b = snap.switch(&key("b")).unwrap();
        let c = snap.switch(&key("c")).unwrap();

        assert!(snap.conflict);
        assert!(a.shake && a.shake_strong);
        assert!(b.shake && !b.shake_strong);
        assert!(!c.shake && !c.shake_strong);
        assert_eq!(snap.on_count(), 3);
    }

    #[test]
    fn should_mark_dropped_switch_as_falling_until_next_toggle() {
        let mut board = board();
        let drop = reach_conflict(&mut board);
        board.timer_fired(drop);

        let snap = board.snapshot();
        assert!(snap.switch(&key("a")).unwrap().falling);
        assert!(snap.switches.iter().all(|s| !s.shake && !s.shake_strong));

        board.toggle(&key("b")).unwrap();
        assert!(board.snapshot().switches.iter().all(|s| !s.falling));
    }

    // ── Scenario ──────────────────────────────────────────────────

    fn demo_scenario() -> Scenario {
        Scenario {
            initial_on: vec![key("b"), key("c")],
            autoplay: Some(Autoplay {
                key: key("a"),
                after: Duration::from_secs(1),
            }),
        }
    }

    #[test]
    fn should_turn_on_initial_switches_and_schedule_autoplay() {
        let mut board = board();

        let out = board.apply_scenario(&demo_scenario()).unwrap();

        assert_eq!(board.order().to_vec(), vec![key("b"), key("c")]);
        let timers = scheduled(&out);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].1, TimerKind::Autoplay { key: key("a") });
        assert_eq!(timers[0].2, Duration::from_secs(1));
    }

    #[test]
    fn should_start_forcing_when_autoplay_fires() {
        let mut board = board();
        let out = board.apply_scenario(&demo_scenario()).unwrap();
        let autoplay = scheduled(&out)[0].0;

        let out = board.timer_fired(autoplay);

        assert_eq!(phase(&board, "a"), SwitchPhase::TurningOn);
        assert_eq!(
            scheduled(&out)[0].1,
            TimerKind::Activation { key: key("a") }
        );
    }

    #[test]
    fn should_force_autoplay_key_at_once_on_advance() {
        let mut board = board();
        let out = board.apply_scenario(&demo_scenario()).unwrap();
        let autoplay = scheduled(&out)[0].0;

        let out = board.advance();

        assert!(cancelled(&out).contains(&autoplay));
        assert!(board.is_conflict());
        assert_eq!(board.order().to_vec(), vec![key("b"), key("c"), key("a")]);
        assert_eq!(board.drop_target(), Some(&key("b")));
        assert_eq!(board.pending_timers().count(), 1);
    }

    #[test]
    fn should_refuse_scenario_whose_autoplay_would_turn_an_initial_switch_off() {
        let mut board = board();
        let scenario = Scenario {
            autoplay: Some(Autoplay {
                key: key("c"),
                after: Duration::from_secs(1),
            }),
            ..demo_scenario()
        };

        let err = board.apply_scenario(&scenario).unwrap_err();

        assert!(matches!(
            err,
            TrilemmaError::Validation(ValidationError::AutoplayAlreadyOn(ref k)) if k == "c"
        ));
        assert!(board.order().is_empty());
        assert_eq!(board.pending_timers().count(), 0);
    }

    #[test]
    fn should_cancel_autoplay_when_user_toggles() {
        let mut board = board();
        board.apply_scenario(&demo_scenario()).unwrap();

        let out = board.toggle(&key("b")).unwrap();

        assert!(out.events.contains(&EventKind::AutoplayCancelled { key: key("a") }));
        assert_eq!(board.pending_timers().count(), 0);
    }

    #[test]
    fn should_restart_scenario_from_any_state() {
        let mut board = board();
        reach_conflict(&mut board);

        let out = board.restart(&demo_scenario()).unwrap();

        assert_eq!(out.events[0], EventKind::BoardReset);
        assert!(!board.is_conflict());
        assert_eq!(board.order().to_vec(), vec![key("b"), key("c")]);
        assert_eq!(board.pending_timers().count(), 1);
    }

    #[test]
    fn should_leave_board_untouched_when_restart_scenario_is_invalid() {
        let mut board = board();
        board.toggle(&key("a")).unwrap();
        let bad = Scenario {
            initial_on: vec![key("zzz")],
            autoplay: None,
        };

        let result = board.restart(&bad);

        assert!(matches!(result, Err(TrilemmaError::Validation(_))));
        assert_eq!(board.order().to_vec(), vec![key("a")]);
    }
}
