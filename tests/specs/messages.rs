// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status messages and the sticky viewer error.

use crate::prelude::*;

fn rpc_text(session: &Session, name: &str, text: &str) {
    session.invoke_rpc(name, vec![Value::Str(text.into())]).unwrap();
}

#[test]
fn viewer_error_fails_one_rendezvous() {
    let viewer = ViewerFixture::start();
    let (session, sink) = viewer.connect_capturing(SessionConfig::default());

    rpc_text(&session, "RaiseError", "no such plot");
    assert_eq!(session.synchronize().unwrap(), SyncStatus::ViewerError { message: "no such plot".into() });
    assert_eq!(session.last_error().as_deref(), Some("no such plot"));
    assert_eq!(sink.texts(), vec!["no such plot".to_string()]);

    assert_eq!(session.synchronize().unwrap(), SyncStatus::Complete);
}

#[test]
fn cleared_error_does_not_fail() {
    let viewer = ViewerFixture::start();
    let (session, _sink) = viewer.connect_capturing(SessionConfig::default());

    rpc_text(&session, "RaiseError", "transient");
    session.invoke_rpc("ClearError", vec![]).unwrap();
    assert_eq!(session.synchronize().unwrap(), SyncStatus::Complete);
}

#[test]
fn suppression_level_filters_lesser_messages() {
    let viewer = ViewerFixture::start();
    let (session, sink) = viewer.connect_capturing(SessionConfig::default().message_level(2));

    rpc_text(&session, "Inform", "fyi");
    rpc_text(&session, "Message", "note");
    rpc_text(&session, "Warn", "careful");
    session.synchronize().unwrap();

    assert_eq!(sink.texts(), vec!["careful".to_string()]);
    assert_eq!(session.latest_message().map(|m| m.severity), Some(Severity::Warning));
}

#[test]
fn malformed_rpc_is_reported_as_viewer_error() {
    let viewer = ViewerFixture::start();
    let (session, _sink) = viewer.connect_capturing(SessionConfig::default());

    session.invoke_rpc("NoSuchRpc", vec![]).unwrap();
    let status = session.synchronize().unwrap();
    assert!(matches!(status, SyncStatus::ViewerError { ref message } if message.contains("NoSuchRpc")));
}
