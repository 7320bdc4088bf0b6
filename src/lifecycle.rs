//! Card lifecycle: entering → idle → exiting → (removed).
//!
//! DESIGN
//! ======
//! [`Phase::next`] is the pure transition table. [`CardLifecycle`] drives it
//! with timers: a settle timer scheduled at creation promotes the card to
//! `idle`, and a delete request moves it to `exiting` and schedules the exit
//! timer after which the owner hard-deletes the card from the store.
//!
//! Each card has at most one lifecycle timer pending (settle or exit), kept
//! in `pending` so a stale firing can be recognized and ignored.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Timings;
use crate::store::{CanvasStore, CardId};
use crate::timers::{Fired, TimerId, TimerKind, Timers};

/// Animation stage of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Just printed; painted in its pre-entrance pose.
    #[default]
    Entering,
    /// Settled on the canvas; draggable and raisable.
    Idle,
    /// Playing its departure animation; rejects reposition and raise.
    Exiting,
}

/// Inputs to the phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The entrance settle delay elapsed.
    Settled,
    /// The user asked to dismiss the card.
    DeleteRequested,
}

impl Phase {
    /// Phase after `event`, or `None` if the event does not apply.
    #[must_use]
    pub fn next(self, event: LifecycleEvent) -> Option<Phase> {
        match (self, event) {
            (Self::Entering, LifecycleEvent::Settled) => Some(Self::Idle),
            (Self::Entering | Self::Idle, LifecycleEvent::DeleteRequested) => Some(Self::Exiting),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Idle => "idle",
            Self::Exiting => "exiting",
        }
    }
}

/// Outcome of a lifecycle timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    /// The card moved to a new phase.
    Entered(Phase),
    /// The exit animation finished; the owner must purge the card.
    Expired,
}

/// Timer bookkeeping for every live card's phase.
#[derive(Debug, Default)]
pub struct CardLifecycle {
    pending: HashMap<CardId, TimerId>,
}

impl CardLifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the entrance settle timer for a freshly created card.
    pub fn on_created(&mut self, card: CardId, timers: &mut Timers, timings: &Timings) {
        let id = timers.schedule(card, TimerKind::Settle, timings.enter_settle);
        self.replace_pending(card, id, timers);
    }

    /// Move a card to `exiting` and schedule its removal.
    ///
    /// Returns false without side effects if the card is absent or already
    /// exiting, so repeated requests are harmless.
    pub fn request_delete(
        &mut self,
        card: CardId,
        store: &mut CanvasStore,
        timers: &mut Timers,
        timings: &Timings,
    ) -> bool {
        let Some(current) = store.get(&card).map(|c| c.phase) else {
            return false;
        };
        let Some(next) = current.next(LifecycleEvent::DeleteRequested) else {
            return false;
        };
        store.set_phase(&card, next);
        let id = timers.schedule(card, TimerKind::Exit, timings.exit_animation);
        self.replace_pending(card, id, timers);
        debug!(card_id = %card, from = current.as_str(), "card exiting");
        true
    }

    /// Handle a fired `Settle` or `Exit` timer. Stale firings return `None`.
    pub fn on_timer(&mut self, fired: &Fired, store: &mut CanvasStore) -> Option<LifecycleStep> {
        if self.pending.get(&fired.card) != Some(&fired.id) {
            return None;
        }
        self.pending.remove(&fired.card);

        match fired.kind {
            TimerKind::Settle => {
                let current = store.get(&fired.card)?.phase;
                let next = current.next(LifecycleEvent::Settled)?;
                store.set_phase(&fired.card, next);
                Some(LifecycleStep::Entered(next))
            }
            TimerKind::Exit => Some(LifecycleStep::Expired),
            TimerKind::TypeStart | TimerKind::TypeTick => None,
        }
    }

    /// Drop bookkeeping for a removed card. Its timers are revoked by the owner.
    pub fn forget(&mut self, card: &CardId) {
        self.pending.remove(card);
    }

    /// Drop bookkeeping for every card.
    pub fn forget_all(&mut self) {
        self.pending.clear();
    }

    /// Whether a settle or exit timer is pending for `card`.
    #[must_use]
    pub fn is_pending(&self, card: &CardId) -> bool {
        self.pending.contains_key(card)
    }

    fn replace_pending(&mut self, card: CardId, id: TimerId, timers: &mut Timers) {
        if let Some(previous) = self.pending.insert(card, id) {
            timers.cancel(previous);
        }
    }
}
