use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::audio::AudioCue;
use crate::config::{ConfigError, DeskConfig, Timings, is_non_negative};
use crate::consts::WELCOME_TEXT;
use crate::drag::{DragController, PointerTarget};
use crate::geometry::Point;
use crate::lifecycle::{CardLifecycle, LifecycleStep, Phase};
use crate::store::{CanvasStore, Card, CardId, ColorTag, SubscriptionId};
use crate::timers::{TimerKind, Timers};
use crate::typewriter::TypewriterController;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Something visible changed; repaint from [`Engine::snapshot`].
    RenderNeeded,
    /// A card changed phase.
    PhaseChanged { id: CardId, phase: Phase },
    /// A card's displayed prefix grew to `chars` characters.
    TextRevealed { id: CardId, chars: usize, complete: bool },
    /// A card left the collection.
    CardRemoved { id: CardId },
}

/// Render-ready view of one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: CardId,
    /// Displayed prefix of the message.
    pub text: String,
    /// Whether the whole message is displayed.
    pub complete: bool,
    pub position: Point,
    pub z_index: i64,
    pub rotation: f64,
    pub color: ColorTag,
    pub created_at: String,
    pub label: String,
    pub phase: Phase,
    /// Whether this card is held by the active drag session.
    pub dragging: bool,
}

/// The card engine: store, timers, lifecycle, typewriter and drag wired together.
///
/// Single-threaded. The host forwards input through the handler methods and
/// moves time forward with [`Engine::advance`]; every timer callback runs
/// inside that call.
pub struct Engine {
    store: CanvasStore,
    timers: Timers,
    lifecycle: CardLifecycle,
    typewriter: TypewriterController,
    drag: DragController,
    audio: Box<dyn AudioCue>,
    timings: Timings,
}

impl Engine {
    /// Build an engine. Seeds the welcome card when the config asks for it.
    ///
    /// # Errors
    ///
    /// Returns the [`DeskConfig::validate`] error for an out-of-range config.
    pub fn new<A>(config: DeskConfig, audio: A) -> Result<Self, ConfigError>
    where
        A: AudioCue + 'static,
    {
        config.validate()?;
        let mut engine = Self {
            store: CanvasStore::new(config.spawn),
            timers: Timers::new(),
            lifecycle: CardLifecycle::new(),
            typewriter: TypewriterController::new(),
            drag: DragController::new(),
            audio: Box::new(audio),
            timings: config.timings,
        };
        if config.welcome_card {
            let id = engine.store.create_welcome(WELCOME_TEXT);
            engine.start_card(id, WELCOME_TEXT);
        }
        Ok(engine)
    }

    // --- Printing and removal ---

    /// Print a card and start its entrance and typewriter timers.
    pub fn print(&mut self, text: &str, color: ColorTag) -> CardId {
        let id = self.store.create(text, color);
        self.start_card(id, text);
        info!(card_id = %id, %color, cards = self.store.len(), "card printed");
        id
    }

    /// Dismiss a card with its exit animation. Repeated requests are ignored.
    pub fn delete(&mut self, id: &CardId) -> Vec<Action> {
        if !self.lifecycle.request_delete(*id, &mut self.store, &mut self.timers, &self.timings) {
            return Vec::new();
        }
        self.typewriter.halt(id, &mut self.timers);
        self.drag.release_card(id);
        vec![Action::PhaseChanged { id: *id, phase: Phase::Exiting }, Action::RenderNeeded]
    }

    /// Remove a card at once, skipping the exit animation.
    pub fn remove_now(&mut self, id: &CardId) -> Vec<Action> {
        if self.purge(id) {
            vec![Action::CardRemoved { id: *id }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Remove every card at once and revoke all of their timers.
    pub fn clear(&mut self) -> Vec<Action> {
        let removed = self.store.clear();
        self.timers.cancel_all();
        self.lifecycle.forget_all();
        self.typewriter.forget_all();
        self.drag.end();
        if removed.is_empty() {
            return Vec::new();
        }
        info!(count = removed.len(), "desk cleared");
        let mut actions: Vec<Action> = removed.into_iter().map(|id| Action::CardRemoved { id }).collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Stacking and position ---

    /// Move a card. Ignored for absent or exiting cards.
    pub fn reposition(&mut self, id: &CardId, position: Point) -> Vec<Action> {
        render_if(self.store.reposition(id, position))
    }

    /// Bring a card to the top. Ignored for absent or exiting cards.
    pub fn raise(&mut self, id: &CardId) -> Vec<Action> {
        render_if(self.store.raise(id))
    }

    // --- Pointer input ---

    /// Pointer pressed on a card.
    pub fn pointer_down(
        &mut self,
        id: &CardId,
        pointer: Point,
        card_top_left: Point,
        target: PointerTarget,
    ) -> Vec<Action> {
        let had_session = self.drag.is_dragging();
        let started = self.drag.begin(*id, pointer, card_top_left, target, &mut self.store);
        render_if(started || had_session)
    }

    /// Pointer moved anywhere while captured.
    pub fn pointer_move(&mut self, pointer: Point) -> Vec<Action> {
        render_if(self.drag.move_to(pointer, &mut self.store))
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        render_if(self.drag.end().is_some())
    }

    /// Pointer capture lost (cancel, window blur, pointer left the surface).
    pub fn pointer_cancel(&mut self) -> Vec<Action> {
        self.pointer_up()
    }

    // --- Time ---

    /// Advance the virtual clock by `elapsed`, firing every timer that falls due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Action> {
        let target = self.timers.now().saturating_add(elapsed);
        let mut actions = Vec::new();

        while let Some(fired) = self.timers.pop_due(target) {
            match fired.kind {
                TimerKind::Settle | TimerKind::Exit => match self.lifecycle.on_timer(&fired, &mut self.store) {
                    Some(LifecycleStep::Entered(phase)) => {
                        actions.push(Action::PhaseChanged { id: fired.card, phase });
                    }
                    Some(LifecycleStep::Expired) => {
                        if self.purge(&fired.card) {
                            actions.push(Action::CardRemoved { id: fired.card });
                        }
                    }
                    None => {}
                },
                TimerKind::TypeStart | TimerKind::TypeTick => {
                    let reveal = self.typewriter.on_timer(&fired, &mut self.timers, &self.timings, self.audio.as_ref());
                    if let Some(reveal) = reveal {
                        actions.push(Action::TextRevealed {
                            id: reveal.card,
                            chars: reveal.chars,
                            complete: reveal.complete,
                        });
                    }
                }
            }
        }
        self.timers.advance_to(target);

        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Advance straight to the next pending deadline, if any.
    pub fn advance_to_next(&mut self) -> Vec<Action> {
        match self.timers.next_deadline() {
            Some(at) => self.advance(at.saturating_sub(self.timers.now())),
            None => Vec::new(),
        }
    }

    // --- Viewport ---

    /// Update the viewport used to place new cards. Invalid sizes are ignored.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if is_non_negative(width) && is_non_negative(height) {
            self.store.set_viewport(width, height);
        } else {
            debug!(width, height, "ignored invalid viewport");
        }
    }

    // --- Subscriptions ---

    /// Observe the raw card collection after every store mutation.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&[Card]) + 'static,
    {
        self.store.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Queries ---

    /// Every live card in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CardView> {
        self.store.cards().iter().map(|c| self.view_of(c)).collect()
    }

    /// Every live card, bottom of the stack first.
    #[must_use]
    pub fn paint_order(&self) -> Vec<CardView> {
        self.store.paint_order().into_iter().map(|c| self.view_of(c)).collect()
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<CardView> {
        self.store.get(id).map(|c| self.view_of(c))
    }

    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    #[must_use]
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // --- Internals ---

    fn start_card(&mut self, id: CardId, text: &str) {
        self.lifecycle.on_created(id, &mut self.timers, &self.timings);
        self.typewriter.bind(id, text, &mut self.timers, &self.timings);
    }

    /// Hard-remove a card and everything scheduled for it.
    fn purge(&mut self, id: &CardId) -> bool {
        let revoked = self.timers.cancel_card(*id);
        self.lifecycle.forget(id);
        self.typewriter.forget(id);
        self.drag.release_card(id);
        let removed = self.store.delete(id).is_some();
        if removed {
            debug!(card_id = %id, revoked, "card purged");
        }
        removed
    }

    fn view_of(&self, card: &Card) -> CardView {
        let (text, complete) = match self.typewriter.view(&card.id) {
            Some(tw) => (tw.revealed().to_owned(), tw.is_complete()),
            None => (String::new(), card.full_text.is_empty()),
        };
        CardView {
            id: card.id,
            text,
            complete,
            position: card.position,
            z_index: card.z_index,
            rotation: card.rotation,
            color: card.color,
            created_at: card.created_at.clone(),
            label: card.label(),
            phase: card.phase,
            dragging: self.drag.dragged_card() == Some(card.id),
        }
    }
}

fn render_if(changed: bool) -> Vec<Action> {
    if changed { vec![Action::RenderNeeded] } else { Vec::new() }
}
