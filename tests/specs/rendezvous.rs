// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendezvous against a live viewer.

use std::time::Duration;

use crate::prelude::*;

#[yare::parameterized(
    condvar = { SyncBackendKind::Condvar },
    polling = { SyncBackendKind::Polling },
)]
fn sync_completes_after_updates_apply(backend: SyncBackendKind) {
    let viewer = ViewerFixture::start();
    let session = viewer.connect_with(SessionConfig::default().backend(backend));

    session
        .lock()
        .declare(vx_core::StateObject::new("ImageAttributes").with_field("width", 0i64));
    session.update("ImageAttributes", |image| image.set("width", 640i64)).unwrap();

    assert_eq!(session.synchronize().unwrap(), SyncStatus::Complete);
    let image = viewer.viewer().object("ImageAttributes").unwrap();
    assert_eq!(image.get("width"), Some(&Value::Int(640)));
}

#[test]
fn repeated_syncs_each_complete() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    for _ in 0..20 {
        assert_eq!(sync_code(&session.synchronize()), 0);
    }
    assert_eq!(viewer.viewer().stats().syncs_echoed, 20);
}

#[test]
fn slow_echo_still_completes() {
    let viewer = ViewerFixture::start_with(|config| config.echo_delay(Duration::from_millis(50)));
    let session = viewer.connect();
    assert!(session.synchronize().unwrap().is_complete());
}

#[test]
fn crashed_viewer_yields_minus_one() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    session.invoke_rpc("Crash", vec![]).unwrap();

    let result = session.synchronize();
    assert_eq!(sync_code(&result), -1);
    assert!(!session.is_viewer_alive());

    // later rendezvous fail fast
    assert!(matches!(session.synchronize(), Err(SyncError::ViewerTerminated)));
}

#[test]
fn interrupt_unwinds_the_pending_rendezvous() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    session.set_ready();
    session.invoke_rpc("Interrupt", vec![]).unwrap();

    let result = session.synchronize();
    assert!(matches!(result, Err(SyncError::Interrupted)));
    assert_eq!(sync_code(&result), -1);
    assert!(!session.interrupt_pending());
    assert_eq!(session.synchronize().unwrap(), SyncStatus::Complete);
}
