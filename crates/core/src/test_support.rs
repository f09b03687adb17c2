// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{fields, ClientMethod, ObjectTag, Severity, StateUpdate, StatusRecord, Value};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for protocol values.
pub mod strategies {
    use crate::{ClientMethod, Value};
    use proptest::prelude::*;

    pub fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::Int),
            // quarter steps keep doubles exact through JSON
            (-1_000_000i32..1_000_000).prop_map(|n| Value::Double(f64::from(n) / 4.0)),
            any::<bool>().prop_map(Value::Bool),
            "[a-z]{0,8}".prop_map(Value::Str),
        ]
    }

    pub fn arb_value() -> impl Strategy<Value = Value> {
        arb_scalar().prop_recursive(2, 16, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Value::List)
        })
    }

    pub fn arb_named_method() -> impl Strategy<Value = ClientMethod> {
        ("[A-Z][a-zA-Z]{0,10}", prop::collection::vec(arb_scalar(), 0..3))
            .prop_map(|(name, args)| ClientMethod::from_call(&name, args))
    }
}

// ── Update factory functions ────────────────────────────────────────────

pub fn sync_echo(tag: i64) -> StateUpdate {
    StateUpdate::new(ObjectTag::sync()).with(fields::SYNC_TAG, tag)
}

pub fn status(severity: Severity, text: &str) -> StateUpdate {
    StatusRecord::new(severity, text).to_update()
}

pub fn client_method(name: &str, args: Vec<Value>) -> StateUpdate {
    ClientMethod::from_call(name, args).to_update()
}
