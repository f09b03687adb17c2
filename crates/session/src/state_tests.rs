// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vx_core::test_support::{client_method, status, sync_echo};
use vx_core::Severity;

use super::*;
use crate::connection::Connection;
use crate::fake::FakeViewer;
use crate::messages::MemorySink;
use crate::methods::ChannelMode;

fn state() -> (SessionState, FakeViewer) {
    let (connection, viewer) = FakeViewer::pair();
    let (_reader, writer) = Box::new(connection).split().unwrap();
    (SessionState::new(writer, "batch".into(), 0, Box::new(MemorySink::new())), viewer)
}

fn make_ready(state: &mut SessionState) {
    state.methods.begin_drain();
    while state.methods.next_buffered().is_some() {}
    assert_eq!(state.methods.mode(), ChannelMode::Ready);
}

#[test]
fn current_echo_wakes_and_stale_does_not() {
    let (mut state, _viewer) = state();
    let old = state.sync.next_tag();
    let current = state.sync.next_tag();

    assert!(!state.dispatch(&sync_echo(old)).wake);
    assert!(state.dispatch(&sync_echo(current)).wake);
}

#[test]
fn unknown_object_is_dropped() {
    let (mut state, _viewer) = state();
    let outcome = state.dispatch(&StateUpdate::new("Annotation").with("text", "hi"));
    assert!(!outcome.wake);
    assert!(outcome.deferred.is_none());
    assert!(!state.registry.contains("Annotation"));
}

#[test]
fn error_status_latches() {
    let (mut state, _viewer) = state();
    state.dispatch(&status(Severity::Error, "plot failed"));
    assert!(state.messages.error_pending());
}

#[test]
fn malformed_status_is_ignored() {
    let (mut state, _viewer) = state();
    let update = StateUpdate::new(vx_core::tag::MESSAGE_ATTRIBUTES).with(fields::SEVERITY, "loud");
    state.dispatch(&update);
    assert!(!state.messages.error_pending());
}

#[test]
fn methods_buffer_until_ready() {
    let (mut state, _viewer) = state();
    let outcome = state.dispatch(&client_method("Interrupt", vec![]));
    assert!(outcome.deferred.is_none());
    assert!(!state.interrupted);
    assert_eq!(state.methods.pending_len(), 1);
}

#[test]
fn interrupt_sets_flag_when_ready() {
    let (mut state, _viewer) = state();
    make_ready(&mut state);
    state.dispatch(&client_method("Interrupt", vec![]));
    assert!(state.interrupted);
}

#[test]
fn quit_is_recorded_and_deferred() {
    let (mut state, _viewer) = state();
    make_ready(&mut state);
    let outcome = state.dispatch(&client_method("Quit", vec![]));
    assert!(state.quit_requested);
    assert!(matches!(outcome.deferred, Some(Deferred::Quit(None))));
}

#[test]
fn named_method_without_handler_is_dropped() {
    let (mut state, _viewer) = state();
    make_ready(&mut state);
    assert!(state.dispatch(&client_method("SaveWindow", vec![])).deferred.is_none());
}

#[test]
fn named_method_with_handler_is_deferred() {
    let (mut state, _viewer) = state();
    state.methods.register("SaveWindow", Arc::new(|_, _| {})).unwrap();
    make_ready(&mut state);
    let outcome = state.dispatch(&client_method("SaveWindow", vec![Value::Int(1)]));
    match outcome.deferred {
        Some(Deferred::Invoke { method, .. }) => assert_eq!(method.args(), &[Value::Int(1)]),
        _ => panic!("expected a deferred invocation"),
    }
}

#[test]
fn query_replies_with_client_information() {
    let (mut state, viewer) = state();
    state.methods.register("SaveWindow", Arc::new(|_, _| {})).unwrap();
    make_ready(&mut state);
    state.dispatch(&client_method("_QueryClientInformation", vec![]));

    let reply = viewer.expect_update(vx_core::tag::CLIENT_INFORMATION).unwrap();
    assert_eq!(reply.get(fields::CLIENT_NAME), Some(&Value::Str("batch".into())));
    let methods = reply.get(fields::METHODS).and_then(Value::as_list).unwrap();
    assert!(methods.contains(&Value::Str("SaveWindow".into())));
    assert!(methods.contains(&Value::Str("Quit".into())));
}

#[test]
fn observers_see_applied_object() {
    let (mut state, _viewer) = state();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    state.add_observer(
        ObjectTag::message(),
        Box::new(move |object| {
            assert_eq!(object.str(fields::TEXT).unwrap(), "hello");
            seen.fetch_add(1, Ordering::SeqCst);
        }),
    );
    state.dispatch(&status(Severity::Message, "hello"));
    state.dispatch(&sync_echo(0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn notify_sends_only_selected_fields() {
    let (mut state, viewer) = state();
    state.registry.require_mut("ViewerRpc").unwrap().set(fields::RPC, "Redraw").unwrap();
    state.notify("ViewerRpc").unwrap();

    let update = viewer.expect_update("ViewerRpc").unwrap();
    assert_eq!(update.fields.len(), 1);
    assert_eq!(update.get(fields::RPC), Some(&Value::Str("Redraw".into())));

    // nothing selected the second time
    state.notify("ViewerRpc").unwrap();
    assert!(viewer.recv_timeout(Duration::from_millis(50)).is_none());
}

#[test]
fn notify_unknown_object_fails() {
    let (mut state, _viewer) = state();
    assert!(matches!(state.notify("Nope"), Err(SessionError::State(_))));
}

#[test]
fn send_after_viewer_death_is_lost() {
    let (mut state, _viewer) = state();
    state.viewer_dead = true;
    assert!(state.send(&Frame::Detach).unwrap_err().is_lost());
}

#[test]
fn write_failure_marks_viewer_dead() {
    let (mut state, viewer) = state();
    drop(viewer);
    assert!(state.send(&Frame::Detach).is_err());
    assert!(state.viewer_dead);
}
