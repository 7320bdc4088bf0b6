//! Typewriter reveal: one character at a time, with a cue per character.
//!
//! DESIGN
//! ======
//! [`Typewriter`] is the pure reveal machine for one run: an exact prefix of
//! the text that grows by one Unicode scalar per [`Typewriter::step`]. The
//! step that completes the text yields [`Cue::Ding`]; every other step yields
//! [`Cue::Key`].
//!
//! [`TypewriterController`] owns one run per card plus the single timer that
//! drives it. The first character is revealed when the start timer fires (no
//! extra interval wait) with a `key` cue, then one per tick. A one-character
//! text strikes `key` and then rings `ding` on that same start reveal.
//! Rebinding a card to different text cancels the old timer and starts over
//! from the empty prefix; a timer that no longer matches the run's pending
//! handle is ignored.

#[cfg(test)]
#[path = "typewriter_test.rs"]
mod typewriter_test;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::audio::{AudioCue, Cue};
use crate::config::Timings;
use crate::store::CardId;
use crate::timers::{Fired, TimerId, TimerKind, Timers};

/// Reveal state of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: String,
    /// Byte length of the revealed prefix; always on a char boundary.
    revealed: usize,
    revealed_chars: usize,
    complete: bool,
}

impl Typewriter {
    /// A fresh run. Empty text is complete from the start.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            revealed: 0,
            revealed_chars: 0,
            complete: text.is_empty(),
        }
    }

    /// Reveal one more character.
    ///
    /// Returns the cue to fire, or `None` if the run was already complete.
    pub fn step(&mut self) -> Option<Cue> {
        if self.complete {
            return None;
        }
        let next = self.text[self.revealed..].chars().next()?;
        self.revealed += next.len_utf8();
        self.revealed_chars += 1;
        if self.revealed == self.text.len() {
            self.complete = true;
            Some(Cue::Ding)
        } else {
            Some(Cue::Key)
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The currently displayed prefix.
    #[must_use]
    pub fn revealed(&self) -> &str {
        &self.text[..self.revealed]
    }

    /// Length of the displayed prefix in characters.
    #[must_use]
    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Progress reported after a typewriter timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub card: CardId,
    pub chars: usize,
    pub complete: bool,
    pub cue: Cue,
}

#[derive(Debug)]
struct Run {
    machine: Typewriter,
    timer: Option<TimerId>,
}

/// Per-card typewriter runs and their timers.
#[derive(Debug, Default)]
pub struct TypewriterController {
    runs: HashMap<CardId, Run>,
}

impl TypewriterController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `card` to `text` and schedule the run.
    ///
    /// Identical text is a no-op. Different text cancels the previous run
    /// (timer included) and starts a new one from the empty prefix. Empty
    /// text completes at once without scheduling anything or firing cues.
    /// Returns whether a new run was started.
    pub fn bind(&mut self, card: CardId, text: &str, timers: &mut Timers, timings: &Timings) -> bool {
        if let Some(run) = self.runs.get(&card) {
            if run.machine.text() == text {
                return false;
            }
        }
        self.cancel(&card, timers);

        let machine = Typewriter::new(text);
        let timer = if machine.is_complete() {
            None
        } else {
            Some(timers.schedule(card, TimerKind::TypeStart, timings.type_start_delay))
        };
        debug!(card_id = %card, chars = text.chars().count(), "typewriter bound");
        self.runs.insert(card, Run { machine, timer });
        true
    }

    /// Handle a fired `TypeStart` or `TypeTick` timer.
    ///
    /// Reveals one character, triggers its cue on `audio`, and schedules the
    /// next tick unless the run just completed. Stale firings return `None`.
    pub fn on_timer(
        &mut self,
        fired: &Fired,
        timers: &mut Timers,
        timings: &Timings,
        audio: &dyn AudioCue,
    ) -> Option<Reveal> {
        let run = self.runs.get_mut(&fired.card)?;
        if run.timer != Some(fired.id) {
            return None;
        }
        run.timer = None;

        let cue = run.machine.step()?;
        // The first character always strikes a key, even when it is also the last.
        if fired.kind == TimerKind::TypeStart && cue == Cue::Ding {
            audio.trigger(Cue::Key);
        }
        audio.trigger(cue);
        if !run.machine.is_complete() {
            run.timer = Some(timers.schedule(fired.card, TimerKind::TypeTick, timings.type_interval));
        }
        trace!(card_id = %fired.card, chars = run.machine.revealed_chars(), cue = cue.as_str(), "revealed");

        Some(Reveal {
            card: fired.card,
            chars: run.machine.revealed_chars(),
            complete: run.machine.is_complete(),
            cue,
        })
    }

    /// Stop a run where it is. The revealed prefix stays visible; no further
    /// characters or cues follow. Returns whether a pending timer was revoked.
    pub fn halt(&mut self, card: &CardId, timers: &mut Timers) -> bool {
        let Some(run) = self.runs.get_mut(card) else {
            return false;
        };
        match run.timer.take() {
            Some(id) => timers.cancel(id),
            None => false,
        }
    }

    /// Cancel a run and drop it entirely.
    pub fn cancel(&mut self, card: &CardId, timers: &mut Timers) {
        if let Some(run) = self.runs.remove(card) {
            if let Some(id) = run.timer {
                timers.cancel(id);
            }
        }
    }

    /// Drop a removed card's run. Its timers are revoked by the owner.
    pub fn forget(&mut self, card: &CardId) {
        self.runs.remove(card);
    }

    /// Drop every run.
    pub fn forget_all(&mut self) {
        self.runs.clear();
    }

    /// Reveal state for `card`.
    #[must_use]
    pub fn view(&self, card: &CardId) -> Option<&Typewriter> {
        self.runs.get(card).map(|run| &run.machine)
    }

    /// Whether `card` still has characters scheduled to appear.
    #[must_use]
    pub fn is_running(&self, card: &CardId) -> bool {
        self.runs.get(card).is_some_and(|run| run.timer.is_some())
    }
}
