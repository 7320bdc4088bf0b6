//! Shared constants for the card engine.

// ── Lifecycle ───────────────────────────────────────────────────

/// Delay between card creation and the `entering → idle` promotion, in ms.
pub const ENTER_SETTLE_MS: u64 = 50;

/// Duration of the exit animation before a dismissed card is removed, in ms.
pub const EXIT_ANIMATION_MS: u64 = 300;

// ── Typewriter ──────────────────────────────────────────────────

/// Delay between card creation and the first revealed character, in ms.
pub const TYPE_START_DELAY_MS: u64 = 400;

/// Interval between revealed characters, in ms.
pub const TYPE_INTERVAL_MS: u64 = 50;

// ── Stacking ────────────────────────────────────────────────────

/// Initial value of the z-index counter. The first card gets `Z_INDEX_BASE + 1`.
pub const Z_INDEX_BASE: i64 = 100;

// ── Spawning ────────────────────────────────────────────────────

/// Default viewport width in CSS pixels, used until the host reports one.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// Default viewport height in CSS pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Horizontal distance from the viewport center to the spawn point.
pub const SPAWN_OFFSET_X: f64 = 140.0;

/// Vertical distance from the viewport center to the spawn point.
pub const SPAWN_OFFSET_Y: f64 = 200.0;

/// Topmost allowed spawn y, keeping new cards clear of the header.
pub const SPAWN_MIN_Y: f64 = 50.0;

/// Half-width of the uniform spawn jitter on each axis, in pixels.
pub const SPAWN_JITTER_PX: f64 = 20.0;

/// Half-width of the random rotation range, in degrees.
pub const MAX_ROTATION_DEG: f64 = 3.0;

// ── Welcome card ────────────────────────────────────────────────

/// Text of the card seeded at startup.
pub const WELCOME_TEXT: &str = "Welcome to MotoType Fix.\n\nType in the console below and hit PRINT to generate a message.\n\nDrag this card to clear your workspace.";

/// Fixed tilt of the welcome card, in degrees.
pub const WELCOME_ROTATION_DEG: f64 = -2.0;

/// Horizontal distance from the viewport center to the welcome card.
pub const WELCOME_OFFSET_X: f64 = 160.0;

/// Leftmost allowed x for the welcome card.
pub const WELCOME_MIN_X: f64 = 20.0;

/// Vertical distance from the upper third line to the welcome card.
pub const WELCOME_OFFSET_Y: f64 = 50.0;

/// Topmost allowed y for the welcome card.
pub const WELCOME_MIN_Y: f64 = 80.0;
