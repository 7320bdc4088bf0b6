#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn point_new_sets_fields() {
    let p = Point::new(3.0, -4.5);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, -4.5);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

#[test]
fn point_sub_gives_offset() {
    let offset = Point::new(100.0, 100.0) - Point::new(80.0, 80.0);
    assert_eq!(offset, Point::new(20.0, 20.0));
}

#[test]
fn point_add_then_sub_restores() {
    let a = Point::new(12.5, -7.0);
    let b = Point::new(-3.0, 9.25);
    assert_eq!((a + b) - b, a);
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(Point::new(1.0, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.0, "y": 2.0 }));
}
