//! Audio cue triggers.
//!
//! The engine never synthesizes sound. It calls [`AudioCue::trigger`] and
//! moves on: there is no return value and no acknowledgement, so a sink that
//! cannot play (autoplay blocked, no device) must absorb the failure itself.

#[cfg(test)]
#[path = "audio_test.rs"]
mod audio_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A named audio cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Mechanical key strike, once per revealed character.
    Key,
    /// Carriage bell, once when a card finishes typing.
    Ding,
}

impl Cue {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Ding => "ding",
        }
    }
}

/// Fire-and-forget cue sink.
pub trait AudioCue {
    /// Play `cue`. Must not panic; failures are swallowed by the implementor.
    fn trigger(&self, cue: Cue);
}

impl<F> AudioCue for F
where
    F: Fn(Cue),
{
    fn trigger(&self, cue: Cue) {
        self(cue);
    }
}

/// Sink that drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn trigger(&self, cue: Cue) {
        trace!(cue = cue.as_str(), "cue dropped");
    }
}

/// Sink that records cues in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    cues: Rc<RefCell<Vec<Cue>>>,
}

impl CueLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All cues triggered so far.
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    /// Number of times `cue` was triggered.
    #[must_use]
    pub fn count(&self, cue: Cue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.borrow().is_empty()
    }
}

impl AudioCue for CueLog {
    fn trigger(&self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}
