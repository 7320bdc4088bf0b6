use std::cell::Cell;

use super::*;

#[test]
fn cue_names() {
    assert_eq!(Cue::Key.as_str(), "key");
    assert_eq!(Cue::Ding.as_str(), "ding");
}

#[test]
fn cue_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Cue::Ding).unwrap(), "\"ding\"");
    let back: Cue = serde_json::from_str("\"key\"").unwrap();
    assert_eq!(back, Cue::Key);
}

#[test]
fn cue_log_records_in_order() {
    let log = CueLog::new();
    log.trigger(Cue::Key);
    log.trigger(Cue::Key);
    log.trigger(Cue::Ding);
    assert_eq!(log.cues(), vec![Cue::Key, Cue::Key, Cue::Ding]);
    assert_eq!(log.count(Cue::Key), 2);
    assert_eq!(log.count(Cue::Ding), 1);
    assert_eq!(log.len(), 3);
}

#[test]
fn cue_log_clones_share_storage() {
    let log = CueLog::new();
    let handle = log.clone();
    handle.trigger(Cue::Ding);
    assert_eq!(log.cues(), vec![Cue::Ding]);
}

#[test]
fn cue_log_starts_empty() {
    assert!(CueLog::new().is_empty());
}

#[test]
fn closures_are_sinks() {
    let hits = Cell::new(0);
    let sink = |_cue: Cue| hits.set(hits.get() + 1);
    sink.trigger(Cue::Key);
    sink.trigger(Cue::Ding);
    assert_eq!(hits.get(), 2);
}

#[test]
fn silent_accepts_everything() {
    Silent.trigger(Cue::Key);
    Silent.trigger(Cue::Ding);
}
