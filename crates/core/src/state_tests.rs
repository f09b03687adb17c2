// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn plot_object() -> StateObject {
    StateObject::new("PlotAttributes")
        .with_field("opacity", 1.0)
        .with_field("name", "pseudocolor")
        .with_field("levels", 10i64)
}

#[test]
fn declared_fields_start_unselected() {
    let obj = plot_object();
    assert!(!obj.has_selected());
    assert_eq!(obj.revision(), 0);
    assert_eq!(obj.field_names().collect::<Vec<_>>(), vec!["opacity", "name", "levels"]);
}

#[test]
fn set_selects_only_the_mutated_field() {
    let mut obj = plot_object();
    obj.set("levels", 20i64).unwrap();

    assert!(obj.is_selected("levels"));
    assert!(!obj.is_selected("opacity"));
    assert_eq!(obj.revision(), 1);

    let update = obj.take_update();
    assert_eq!(update.tag, "PlotAttributes");
    assert_eq!(update.fields.len(), 1);
    assert_eq!(update.get("levels"), Some(&Value::Int(20)));
    assert!(!obj.has_selected(), "take_update clears the selection");
}

#[test]
fn store_writes_without_selecting() {
    let mut obj = plot_object();
    obj.store("levels", -1i64).unwrap();
    assert_eq!(obj.get("levels"), Some(&Value::Int(-1)));
    assert!(obj.take_update().is_empty());
}

#[test]
fn set_rejects_kind_change() {
    let mut obj = plot_object();
    let err = obj.set("levels", "many").unwrap_err();
    assert!(matches!(err, StateError::TypeMismatch { .. }));
    assert_eq!(obj.get("levels"), Some(&Value::Int(10)));
}

#[test]
fn select_all_sends_everything() {
    let mut obj = plot_object();
    obj.select_all();
    assert_eq!(obj.take_update().fields.len(), 3);
}

#[test]
fn apply_writes_fields_and_keeps_selection() {
    let mut obj = plot_object();
    obj.set("name", "contour").unwrap();

    let update = StateUpdate::new("PlotAttributes").with("opacity", 0.5);
    obj.apply(&update).unwrap();

    assert_eq!(obj.get("opacity"), Some(&Value::Double(0.5)));
    assert!(!obj.is_selected("opacity"));
    assert!(obj.is_selected("name"));
}

#[test]
fn apply_is_all_or_nothing() {
    let mut obj = plot_object();
    let update = StateUpdate::new("PlotAttributes").with("opacity", 0.25).with("levels", "bad");

    assert!(obj.apply(&update).is_err());
    assert_eq!(obj.get("opacity"), Some(&Value::Double(1.0)));
    assert_eq!(obj.revision(), 0);
}

#[test]
fn apply_adds_unknown_fields() {
    let mut obj = plot_object();
    obj.apply(&StateUpdate::new("PlotAttributes").with("extra", true)).unwrap();
    assert_eq!(obj.get("extra"), Some(&Value::Bool(true)));
}

#[test]
fn apply_rejects_foreign_tag() {
    let mut obj = plot_object();
    let err = obj.apply(&StateUpdate::new("Other").with("x", 1i64)).unwrap_err();
    assert!(matches!(err, StateError::Malformed { .. }));
}

#[test]
fn full_update_ignores_selection() {
    let obj = plot_object();
    let update = obj.full_update();
    assert_eq!(update.fields.len(), 3);
}

#[test]
fn typed_accessors_report_missing_and_mismatched_fields() {
    let obj = plot_object();
    assert_eq!(obj.int("levels").unwrap(), 10);
    assert_eq!(obj.str("name").unwrap(), "pseudocolor");
    assert!(matches!(obj.int("nope"), Err(StateError::MissingField { .. })));
    assert!(matches!(obj.int("name"), Err(StateError::TypeMismatch { .. })));
}
