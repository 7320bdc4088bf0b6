#![allow(clippy::float_cmp)]

use std::collections::HashMap;
use std::time::Duration;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_match_constants() {
    let config = DeskConfig::default();
    assert_eq!(config.timings.enter_settle, Duration::from_millis(50));
    assert_eq!(config.timings.exit_animation, Duration::from_millis(300));
    assert_eq!(config.timings.type_start_delay, Duration::from_millis(400));
    assert_eq!(config.timings.type_interval, Duration::from_millis(50));
    assert_eq!(config.spawn.jitter, 20.0);
    assert_eq!(config.spawn.max_rotation, 3.0);
    assert!(config.spawn.seed.is_none());
    assert!(!config.welcome_card);
    assert!(config.validate().is_ok());
}

#[test]
fn with_seed_sets_seed() {
    assert_eq!(DeskConfig::default().with_seed(9).spawn.seed, Some(9));
}

#[test]
fn empty_lookup_yields_defaults() {
    let config = DeskConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config, DeskConfig::default());
}

#[test]
fn lookup_overrides_fields() {
    let config = DeskConfig::from_lookup(lookup_from(&[
        ("MOTOPRINT_TYPE_INTERVAL_MS", "20"),
        ("MOTOPRINT_EXIT_ANIMATION_MS", "0"),
        ("MOTOPRINT_VIEWPORT_WIDTH", "640"),
        ("MOTOPRINT_SEED", "42"),
        ("MOTOPRINT_WELCOME", "true"),
    ]))
    .unwrap();
    assert_eq!(config.timings.type_interval, Duration::from_millis(20));
    assert_eq!(config.timings.exit_animation, Duration::ZERO);
    assert_eq!(config.spawn.viewport_width, 640.0);
    assert_eq!(config.spawn.viewport_height, 800.0);
    assert_eq!(config.spawn.seed, Some(42));
    assert!(config.welcome_card);
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = DeskConfig::from_lookup(lookup_from(&[("MOTOPRINT_SEED", "  ")])).unwrap();
    assert!(config.spawn.seed.is_none());
}

#[test]
fn unparsable_value_is_reported() {
    let err = DeskConfig::from_lookup(lookup_from(&[("MOTOPRINT_TYPE_INTERVAL_MS", "fast")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidValue { var: "MOTOPRINT_TYPE_INTERVAL_MS".into(), value: "fast".into() }
    );
}

#[test]
fn zero_interval_is_rejected() {
    let err = DeskConfig::from_lookup(lookup_from(&[("MOTOPRINT_TYPE_INTERVAL_MS", "0")])).unwrap_err();
    assert_eq!(err, ConfigError::ZeroTypeInterval);
}

#[test]
fn negative_viewport_is_rejected() {
    let mut config = DeskConfig::default();
    config.spawn.viewport_height = -1.0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidViewport { .. })));
}

#[test]
fn nan_jitter_is_rejected() {
    let mut config = DeskConfig::default();
    config.spawn.jitter = f64::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidSpread { field: "jitter", .. })));
}

#[test]
fn negative_rotation_is_rejected() {
    let mut config = DeskConfig::default();
    config.spawn.max_rotation = -0.5;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidSpread { field: "max_rotation", .. })));
}

#[test]
fn error_messages_name_the_variable() {
    let err = ConfigError::InvalidValue { var: "MOTOPRINT_SEED".into(), value: "x".into() };
    assert_eq!(err.to_string(), "invalid value for MOTOPRINT_SEED: \"x\"");
}
