// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vx_core::Value;

#[test]
fn text_lists_name_then_args() {
    let method = ClientMethod::named("SaveWindow", vec![Value::Str("out.png".into()), Value::Int(2)]);
    assert_eq!(format_invocation(&method, OutputFormat::Text).unwrap(), "SaveWindow out.png 2");
}

#[test]
fn text_without_args_is_bare_name() {
    let method = ClientMethod::named("Refresh", vec![]);
    assert_eq!(format_invocation(&method, OutputFormat::Text).unwrap(), "Refresh");
}

#[test]
fn json_is_one_object() {
    let method = ClientMethod::named("Pick", vec![Value::Int(7)]);
    let line = format_invocation(&method, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(json["method"], "Pick");
    assert_eq!(json["args"][0], "7");
}
