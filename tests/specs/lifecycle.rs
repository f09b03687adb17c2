// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connecting, detaching, and quitting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::prelude::*;

#[test]
fn shutdown_detaches_once() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    session.synchronize().unwrap();

    session.shutdown();
    session.shutdown();
    drop(session);

    assert!(wait_for(|| viewer.viewer().stats().detaches == 1));
    assert_eq!(viewer.viewer().stats().detaches, 1);
}

#[test]
fn sessions_are_independent() {
    let viewer = ViewerFixture::start();
    let first = viewer.connect();
    let second = viewer.connect();

    first.invoke_rpc("Crash", vec![]).unwrap();
    assert_eq!(sync_code(&first.synchronize()), -1);
    assert_eq!(second.synchronize().unwrap(), SyncStatus::Complete);
    assert_eq!(viewer.viewer().stats().connections, 2);
}

#[test]
fn quit_runs_handler_and_skips_detach() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    session
        .register_client_method("Quit", move |_, _| {
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();
    session.set_ready();

    session.invoke_rpc("Quit", vec![]).unwrap();
    let _ = session.synchronize();

    assert!(wait_for(|| ran.load(Ordering::SeqCst)));
    assert!(session.quit_requested());
    session.shutdown();
    assert_eq!(viewer.viewer().stats().detaches, 0);
}

#[test]
fn missing_viewer_fails_to_connect() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = Endpoint::Unix(dir.path().join("absent.sock"));
    assert!(Session::connect_endpoint(SessionConfig::default(), &endpoint).is_err());
}

#[test]
fn viewer_stop_wakes_the_session() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    session.synchronize().unwrap();

    drop(viewer);
    assert!(wait_for(|| !session.is_viewer_alive()));
    assert_eq!(sync_code(&session.synchronize()), -1);
}
