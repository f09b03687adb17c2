// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builtins_are_declared() {
    let registry = StateRegistry::with_builtins();
    for tag in [SYNC_ATTRIBUTES, MESSAGE_ATTRIBUTES, CLIENT_METHOD, CLIENT_INFORMATION, VIEWER_RPC]
    {
        assert!(registry.contains(tag), "missing {}", tag);
    }
    let sync = registry.get(SYNC_ATTRIBUTES).unwrap();
    assert_eq!(sync.int(fields::SYNC_TAG).unwrap(), -1);
}

#[test]
fn apply_to_unknown_tag_fails() {
    let mut registry = StateRegistry::new();
    let err = registry.apply(&StateUpdate::new("Missing").with("x", 1i64)).unwrap_err();
    assert_eq!(err, StateError::UnknownObject(ObjectTag::new("Missing")));
}

#[test]
fn apply_or_declare_creates_object() {
    let mut registry = StateRegistry::new();
    let obj = registry.apply_or_declare(&StateUpdate::new("View3D").with("zoom", 2.0)).unwrap();
    assert_eq!(obj.get("zoom"), Some(&Value::Double(2.0)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn apply_returns_updated_object() {
    let mut registry = StateRegistry::with_builtins();
    let update = StateUpdate::new(SYNC_ATTRIBUTES).with(fields::SYNC_TAG, 7i64);
    let obj = registry.apply(&update).unwrap();
    assert_eq!(obj.int(fields::SYNC_TAG).unwrap(), 7);
    assert_eq!(obj.revision(), 1);
}

#[test]
fn declare_replaces_existing() {
    let mut registry = StateRegistry::new();
    registry.declare(StateObject::new("A").with_field("x", 1i64));
    registry.declare(StateObject::new("A").with_field("y", 2i64));
    let obj = registry.get("A").unwrap();
    assert!(obj.get("x").is_none());
    assert_eq!(registry.tags().count(), 1);
}
