// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::registry::StateRegistry;

#[yare::parameterized(
    quit      = { "Quit",                    ClientMethod::Quit },
    interrupt = { "Interrupt",               ClientMethod::Interrupt },
    query     = { "_QueryClientInformation", ClientMethod::QueryClientInformation },
)]
fn builtin_names_map_to_variants(name: &str, expected: ClientMethod) {
    assert_eq!(ClientMethod::from_call(name, vec![]), expected);
    assert_eq!(expected.name(), name);
}

#[test]
fn other_names_are_named_with_args() {
    let method = ClientMethod::from_call("MacroRun", vec![Value::Int(3)]);
    assert_eq!(method, ClientMethod::named("MacroRun", vec![Value::Int(3)]));
    assert_eq!(method.args(), &[Value::Int(3)]);
}

#[test]
fn builtin_variants_carry_no_args() {
    assert!(ClientMethod::Quit.args().is_empty());
}

#[test]
fn parses_from_client_method_object() {
    let mut registry = StateRegistry::with_builtins();
    let method = ClientMethod::named("SaveWindow", vec![Value::Str("out.png".into())]);
    let obj = registry.apply(&method.to_update()).unwrap();
    assert_eq!(ClientMethod::from_object(obj).unwrap(), method);
}

#[test]
fn builtin_method_names_cover_variants() {
    let names = builtin_method_names();
    assert!(names.contains(&QUIT));
    assert!(names.contains(&INTERRUPT));
    assert!(names.contains(&QUERY_CLIENT_INFORMATION));
}
