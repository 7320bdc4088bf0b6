//! Card lifecycle and interaction engine for the retro printer desk.
//!
//! A message typed into the printer becomes a note card on a freeform canvas.
//! The card fades in, types itself out one character at a time (with a key
//! click per character and a bell at the end), can be dragged and restacked,
//! and animates away when dismissed. This crate owns all of that state and
//! timing; the host layer only forwards input, advances the clock, plays the
//! cues, and paints the [`engine::CardView`] snapshot.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::Engine`] composing every component below |
//! | [`store`] | Card collection, z-index counter, and mutation operations |
//! | [`lifecycle`] | Per-card phase machine (entering, idle, exiting) |
//! | [`typewriter`] | Reveal state machine and its per-card timer schedule |
//! | [`drag`] | Pointer-capture drag session |
//! | [`timers`] | Virtual, cancellable timer queue keyed by card |
//! | [`audio`] | Fire-and-forget `key` / `ding` cue triggers |
//! | [`config`] | Timing and spawn configuration, env loading |
//! | [`geometry`] | 2D points |
//! | [`consts`] | Default delays and spawn constants |

pub mod audio;
pub mod config;
pub mod consts;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod lifecycle;
pub mod store;
pub mod timers;
pub mod typewriter;
