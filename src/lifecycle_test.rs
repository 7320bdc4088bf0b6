use std::time::Duration;

use uuid::Uuid;

use super::*;
use crate::config::SpawnConfig;
use crate::store::ColorTag;

fn setup() -> (CanvasStore, Timers, CardLifecycle, Timings) {
    let store = CanvasStore::new(SpawnConfig { seed: Some(3), ..SpawnConfig::default() });
    (store, Timers::new(), CardLifecycle::new(), Timings::default())
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// =============================================================
// Phase transition table
// =============================================================

#[test]
fn phase_default_is_entering() {
    assert_eq!(Phase::default(), Phase::Entering);
}

#[test]
fn phase_transitions() {
    assert_eq!(Phase::Entering.next(LifecycleEvent::Settled), Some(Phase::Idle));
    assert_eq!(Phase::Idle.next(LifecycleEvent::DeleteRequested), Some(Phase::Exiting));
    assert_eq!(Phase::Entering.next(LifecycleEvent::DeleteRequested), Some(Phase::Exiting));
}

#[test]
fn phase_rejects_out_of_order_events() {
    assert_eq!(Phase::Idle.next(LifecycleEvent::Settled), None);
    assert_eq!(Phase::Exiting.next(LifecycleEvent::Settled), None);
    assert_eq!(Phase::Exiting.next(LifecycleEvent::DeleteRequested), None);
}

#[test]
fn phase_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Phase::Exiting).unwrap(), "\"exiting\"");
    assert_eq!(Phase::Idle.as_str(), "idle");
}

// =============================================================
// Settle timer
// =============================================================

#[test]
fn settle_promotes_after_delay() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    let card = store.create("x", ColorTag::White);
    lifecycle.on_created(card, &mut timers, &timings);

    assert!(timers.pop_due(ms(49)).is_none());
    let fired = timers.pop_due(ms(50)).unwrap();
    assert_eq!(fired.kind, TimerKind::Settle);
    assert_eq!(lifecycle.on_timer(&fired, &mut store), Some(LifecycleStep::Entered(Phase::Idle)));
    assert_eq!(store.get(&card).unwrap().phase, Phase::Idle);
    assert!(!lifecycle.is_pending(&card));
}

#[test]
fn settle_for_removed_card_does_nothing() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    let card = store.create("x", ColorTag::White);
    lifecycle.on_created(card, &mut timers, &timings);
    store.delete(&card);

    let fired = timers.pop_due(ms(50)).unwrap();
    assert_eq!(lifecycle.on_timer(&fired, &mut store), None);
    assert!(store.is_empty());
}

// =============================================================
// Delete request
// =============================================================

#[test]
fn delete_moves_idle_card_to_exiting_then_expires() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    let card = store.create("x", ColorTag::White);
    lifecycle.on_created(card, &mut timers, &timings);
    let settle = timers.pop_due(ms(50)).unwrap();
    lifecycle.on_timer(&settle, &mut store);

    assert!(lifecycle.request_delete(card, &mut store, &mut timers, &timings));
    assert_eq!(store.get(&card).unwrap().phase, Phase::Exiting);

    assert!(timers.pop_due(ms(349)).is_none());
    let exit = timers.pop_due(ms(350)).unwrap();
    assert_eq!(exit.kind, TimerKind::Exit);
    assert_eq!(lifecycle.on_timer(&exit, &mut store), Some(LifecycleStep::Expired));
    // Removal is the owner's job.
    assert!(store.get(&card).is_some());
}

#[test]
fn second_delete_request_is_ignored() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    let card = store.create("x", ColorTag::White);
    lifecycle.on_created(card, &mut timers, &timings);

    assert!(lifecycle.request_delete(card, &mut store, &mut timers, &timings));
    let pending = timers.pending();
    assert!(!lifecycle.request_delete(card, &mut store, &mut timers, &timings));
    assert_eq!(timers.pending(), pending);
}

#[test]
fn delete_while_entering_cancels_settle() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    let card = store.create("x", ColorTag::White);
    lifecycle.on_created(card, &mut timers, &timings);
    lifecycle.request_delete(card, &mut store, &mut timers, &timings);

    assert_eq!(timers.pending(), 1);
    let fired = timers.pop_due(ms(1000)).unwrap();
    assert_eq!(fired.kind, TimerKind::Exit);
    assert_eq!(store.get(&card).unwrap().phase, Phase::Exiting);
}

#[test]
fn delete_absent_card_is_ignored() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    assert!(!lifecycle.request_delete(Uuid::new_v4(), &mut store, &mut timers, &timings));
    assert_eq!(timers.pending(), 0);
}

#[test]
fn forgotten_card_ignores_late_timer() {
    let (mut store, mut timers, mut lifecycle, timings) = setup();
    let card = store.create("x", ColorTag::White);
    lifecycle.on_created(card, &mut timers, &timings);
    lifecycle.forget(&card);

    let fired = timers.pop_due(ms(50)).unwrap();
    assert_eq!(lifecycle.on_timer(&fired, &mut store), None);
    assert_eq!(store.get(&card).unwrap().phase, Phase::Entering);
}
