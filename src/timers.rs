//! Virtual timer queue.
//!
//! DESIGN
//! ======
//! Every delay in the engine (entrance settle, typing start, per-character
//! tick, exit animation) is a one-shot timer on this queue. Time only moves
//! when the host calls [`Timers::pop_due`] / [`Timers::advance_to`], so the
//! whole engine runs deterministically under test and under any host clock.
//!
//! Timers fire in `(deadline, scheduling order)` order. Each timer is tagged
//! with the card it belongs to so force removal can revoke all of a card's
//! timers in one call.

#[cfg(test)]
#[path = "timers_test.rs"]
mod timers_test;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::store::CardId;

/// Handle to a scheduled timer. Ordered by deadline, then scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    at: Duration,
    seq: u64,
}

impl TimerId {
    /// Virtual time at which this timer fires.
    #[must_use]
    pub fn deadline(self) -> Duration {
        self.at
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Promote an entering card to idle.
    Settle,
    /// Reveal the first character of a typewriter run.
    TypeStart,
    /// Reveal the next character of a typewriter run.
    TypeTick,
    /// Remove an exiting card.
    Exit,
}

/// A timer popped from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub card: CardId,
    pub kind: TimerKind,
}

/// One-shot timers over a virtual clock.
#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<TimerId, (CardId, TimerKind)>,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a timer for `card` to fire `delay` from now.
    pub fn schedule(&mut self, card: CardId, kind: TimerKind, delay: Duration) -> TimerId {
        let id = TimerId { at: self.now.saturating_add(delay), seq: self.next_seq };
        self.next_seq += 1;
        self.queue.insert(id, (card, kind));
        id
    }

    /// Revoke a timer. Returns false if it already fired or was revoked.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(&id).is_some()
    }

    /// Revoke every pending timer belonging to `card`. Returns how many were revoked.
    pub fn cancel_card(&mut self, card: CardId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, (owner, _)| *owner != card);
        before - self.queue.len()
    }

    /// Revoke every pending timer.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        count
    }

    /// Pop the earliest timer whose deadline is at or before `until`, moving
    /// the clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let (&id, _) = self.queue.first_key_value()?;
        if id.at > until {
            return None;
        }
        let (id, (card, kind)) = self.queue.pop_first()?;
        self.now = self.now.max(id.at);
        Some(Fired { id, card, kind })
    }

    /// Move the clock forward to `t`. Never moves it backward.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first_key_value().map(|(id, _)| id.at)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of pending timers belonging to `card`.
    #[must_use]
    pub fn pending_for(&self, card: CardId) -> usize {
        self.queue.values().filter(|(owner, _)| *owner == card).count()
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.contains_key(&id)
    }
}
