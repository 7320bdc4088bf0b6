//! Pointer-capture drag session.
//!
//! A drag starts on pointer-down over a card body, keeps the card raised
//! above everything else, and moves it so the grab point stays under the
//! pointer. Only one session exists at a time; starting another releases
//! the first, the same way pointer capture moves between elements.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use tracing::debug;

use crate::geometry::Point;
use crate::store::{CanvasStore, CardId};

/// Which part of a card received the pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerTarget {
    /// Anywhere on the card except the dismiss control.
    #[default]
    Body,
    /// The dismiss ("×") control. Never starts a drag.
    DismissControl,
}

/// The active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Card being dragged.
    pub card: CardId,
    /// Pointer position minus the card's top-left at grab time.
    pub offset: Point,
}

/// Owns the (at most one) drag session.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `card`.
    ///
    /// Suppressed for the dismiss control and for cards that are absent or
    /// exiting. Any previous session ends first. Returns whether a session
    /// started.
    pub fn begin(
        &mut self,
        card: CardId,
        pointer: Point,
        card_top_left: Point,
        target: PointerTarget,
        store: &mut CanvasStore,
    ) -> bool {
        if target == PointerTarget::DismissControl {
            return false;
        }
        self.end();
        if !store.raise(&card) {
            return false;
        }
        let offset = pointer - card_top_left;
        self.session = Some(DragSession { card, offset });
        debug!(card_id = %card, dx = offset.x, dy = offset.y, "drag started");
        true
    }

    /// Follow the pointer. Returns whether the card moved.
    pub fn move_to(&mut self, pointer: Point, store: &mut CanvasStore) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        store.reposition(&session.card, pointer - session.offset)
    }

    /// Release the session. Safe to call at any time, any number of times.
    pub fn end(&mut self) -> Option<DragSession> {
        let ended = self.session.take();
        if let Some(session) = &ended {
            debug!(card_id = %session.card, "drag ended");
        }
        ended
    }

    /// Release the session if it belongs to `card`.
    pub fn release_card(&mut self, card: &CardId) -> bool {
        if self.dragged_card() == Some(*card) {
            self.end();
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn dragged_card(&self) -> Option<CardId> {
        self.session.map(|s| s.card)
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }
}
