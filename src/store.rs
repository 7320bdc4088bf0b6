//! Card model and the in-memory canvas store.
//!
//! `CanvasStore` is the only owner of cards. It inserts and removes them,
//! hands out z-index values from a single monotonic counter, and notifies
//! subscribers after every applied mutation. Iteration order is insertion
//! order; renderers that need paint order call [`CanvasStore::paint_order`].
//!
//! Operations naming a card that is missing, or one that is already
//! `exiting`, are silent no-ops: a drag or typewriter callback racing a
//! deletion is expected, not an error.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::debug;
use uuid::Uuid;

use crate::config::SpawnConfig;
use crate::consts::{
    SPAWN_MIN_Y, SPAWN_OFFSET_X, SPAWN_OFFSET_Y, WELCOME_MIN_X, WELCOME_MIN_Y, WELCOME_OFFSET_X, WELCOME_OFFSET_Y,
    WELCOME_ROTATION_DEG, Z_INDEX_BASE,
};
use crate::geometry::Point;
use crate::lifecycle::Phase;

/// Unique identifier for a card.
pub type CardId = Uuid;

/// Paper color of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    White,
    Yellow,
    Green,
    Pink,
}

impl ColorTag {
    pub const ALL: [ColorTag; 4] = [Self::White, Self::Yellow, Self::Green, Self::Pink];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Pink => "pink",
        }
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown paper color: {0:?} (expected white, yellow, green or pink)")]
pub struct ParseColorError(pub String);

impl FromStr for ColorTag {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            "pink" => Ok(Self::Pink),
            _ => Err(ParseColorError(s.to_owned())),
        }
    }
}

/// One printed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Message content. Never changes after creation.
    pub full_text: String,
    /// Display timestamp (`HH:MM`) taken at creation.
    pub created_at: String,
    /// Top-left corner in canvas coordinates. Not clamped to the viewport.
    pub position: Point,
    /// Paint order; higher values are drawn above lower ones.
    pub z_index: i64,
    /// Tilt in degrees, fixed at creation.
    pub rotation: f64,
    pub color: ColorTag,
    pub phase: Phase,
}

impl Card {
    /// Serial label printed on the card header, e.g. `MOTO-FIX-14`.
    #[must_use]
    pub fn label(&self) -> String {
        let hour = self.created_at.split(':').next().unwrap_or_default();
        format!("MOTO-FIX-{hour}")
    }

    /// Whether the card still accepts reposition and raise.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.phase != Phase::Exiting
    }
}

/// Handle returned by [`CanvasStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&[Card])>;

/// In-memory store of cards.
pub struct CanvasStore {
    cards: Vec<Card>,
    max_z: i64,
    spawn: SpawnConfig,
    rng: StdRng,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl CanvasStore {
    /// Create an empty store with the given spawn placement.
    #[must_use]
    pub fn new(spawn: SpawnConfig) -> Self {
        let rng = match spawn.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            cards: Vec::new(),
            max_z: Z_INDEX_BASE,
            spawn,
            rng,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- Mutations ---

    /// Print a new card near the spawn point. Never fails; empty text is allowed.
    pub fn create(&mut self, text: &str, color: ColorTag) -> CardId {
        let position = self.spawn_position();
        let rotation = symmetric(&mut self.rng, self.spawn.max_rotation);
        self.insert_new(text, color, position, rotation)
    }

    /// Seed the welcome card at its fixed placement.
    pub fn create_welcome(&mut self, text: &str) -> CardId {
        let position = Point::new(
            (self.spawn.viewport_width / 2.0 - WELCOME_OFFSET_X).max(WELCOME_MIN_X),
            (self.spawn.viewport_height / 3.0 - WELCOME_OFFSET_Y).max(WELCOME_MIN_Y),
        );
        self.insert_new(text, ColorTag::Yellow, position, WELCOME_ROTATION_DEG)
    }

    /// Move a card. Returns false (and changes nothing) if the card is absent or exiting.
    pub fn reposition(&mut self, id: &CardId, position: Point) -> bool {
        let Some(card) = self.interactive_mut(id) else {
            return false;
        };
        card.position = position;
        self.notify();
        true
    }

    /// Give a card the next z-index. Returns false if the card is absent or exiting.
    ///
    /// The counter advances on every applied call, even when the card is
    /// already on top.
    pub fn raise(&mut self, id: &CardId) -> bool {
        let z = self.max_z + 1;
        let Some(card) = self.interactive_mut(id) else {
            return false;
        };
        card.z_index = z;
        self.max_z = z;
        self.notify();
        true
    }

    /// Remove a card immediately, returning it if it was present.
    pub fn delete(&mut self, id: &CardId) -> Option<Card> {
        let idx = self.cards.iter().position(|c| c.id == *id)?;
        let card = self.cards.remove(idx);
        debug!(card_id = %card.id, remaining = self.cards.len(), "card removed");
        self.notify();
        Some(card)
    }

    /// Remove every card immediately, returning their ids in insertion order.
    pub fn clear(&mut self) -> Vec<CardId> {
        if self.cards.is_empty() {
            return Vec::new();
        }
        let ids: Vec<CardId> = self.cards.drain(..).map(|c| c.id).collect();
        self.notify();
        ids
    }

    /// Set a card's phase. Returns false if the card is absent or already in `phase`.
    pub(crate) fn set_phase(&mut self, id: &CardId, phase: Phase) -> bool {
        let Some(card) = self.cards.iter_mut().find(|c| c.id == *id) else {
            return false;
        };
        if card.phase == phase {
            return false;
        }
        card.phase = phase;
        self.notify();
        true
    }

    /// Move the spawn reference point for cards created from now on.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.spawn.viewport_width = width;
        self.spawn.viewport_height = height;
    }

    // --- Subscriptions ---

    /// Register a callback that receives the full collection after every applied mutation.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&[Card]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Drop a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    // --- Queries ---

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == *id)
    }

    /// All cards in insertion order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// All cards sorted by `z_index` for draw order (bottom first).
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.iter().collect();
        cards.sort_by_key(|c| c.z_index);
        cards
    }

    /// The card painted on top, if any.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.iter().max_by_key(|c| c.z_index)
    }

    /// Highest z-index handed out so far.
    #[must_use]
    pub fn max_z(&self) -> i64 {
        self.max_z
    }

    #[must_use]
    pub fn spawn(&self) -> &SpawnConfig {
        &self.spawn
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // --- Internals ---

    fn insert_new(&mut self, text: &str, color: ColorTag, position: Point, rotation: f64) -> CardId {
        let id = self.fresh_id();
        let z_index = self.next_z();
        self.cards.push(Card {
            id,
            full_text: text.to_owned(),
            created_at: stamp_now(),
            position,
            z_index,
            rotation,
            color,
            phase: Phase::Entering,
        });
        debug!(card_id = %id, %color, z_index, chars = text.chars().count(), "card created");
        self.notify();
        id
    }

    fn fresh_id(&mut self) -> CardId {
        loop {
            let id = uuid::Builder::from_random_bytes(self.rng.random()).into_uuid();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn next_z(&mut self) -> i64 {
        self.max_z += 1;
        self.max_z
    }

    fn spawn_position(&mut self) -> Point {
        let jitter = self.spawn.jitter;
        let x = self.spawn.viewport_width / 2.0 - SPAWN_OFFSET_X + symmetric(&mut self.rng, jitter);
        let y = self.spawn.viewport_height / 2.0 - SPAWN_OFFSET_Y + symmetric(&mut self.rng, jitter);
        Point::new(x, y.max(SPAWN_MIN_Y))
    }

    fn interactive_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == *id && c.is_interactive())
    }

    fn notify(&mut self) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.cards);
        }
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new(SpawnConfig::default())
    }
}

/// Uniform sample in `[-half, half)`, or zero when the range is empty.
fn symmetric(rng: &mut StdRng, half: f64) -> f64 {
    if half.is_finite() && half > 0.0 { rng.random_range(-half..half) } else { 0.0 }
}

fn stamp_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}
