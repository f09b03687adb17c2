// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::registry::StateRegistry;

#[yare::parameterized(
    error       = { Severity::Error },
    warning     = { Severity::Warning },
    message     = { Severity::Message },
    error_clear = { Severity::ErrorClear },
    information = { Severity::Information },
)]
fn severity_display_parses_back(severity: Severity) {
    assert_eq!(Severity::parse(&severity.to_string()), Some(severity));
}

#[test]
fn unknown_severity_is_rejected() {
    assert_eq!(Severity::parse("fatal"), None);
}

#[test]
fn ranks_order_by_importance() {
    assert!(Severity::Error.rank() < Severity::Warning.rank());
    assert!(Severity::Message.rank() < Severity::Information.rank());
    assert_eq!(Severity::ErrorClear.rank(), None);
}

#[test]
fn record_roundtrips_through_message_object() {
    let mut registry = StateRegistry::with_builtins();
    let record = StatusRecord::new(Severity::Warning, "mesh is degenerate");
    let obj = registry.apply(&record.to_update()).unwrap();
    assert_eq!(StatusRecord::from_object(obj).unwrap(), record);
}

#[test]
fn record_with_bad_severity_is_malformed() {
    let mut registry = StateRegistry::with_builtins();
    let update = StateUpdate::new(MESSAGE_ATTRIBUTES)
        .with(fields::TEXT, "x")
        .with(fields::SEVERITY, "loud");
    let obj = registry.apply(&update).unwrap();
    assert!(matches!(StatusRecord::from_object(obj), Err(StateError::Malformed { .. })));
}
