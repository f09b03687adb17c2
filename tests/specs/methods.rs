// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client methods the viewer invokes.

use crossbeam_channel::bounded;

use crate::prelude::*;

fn invoke_client(session: &Session, name: &str, args: Vec<Value>) {
    let mut rpc_args = vec![Value::Str(name.into())];
    rpc_args.extend(args);
    session.invoke_rpc("InvokeClient", rpc_args).unwrap();
}

#[test]
fn registered_handler_runs_with_arguments() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    let (tx, rx) = bounded(4);
    session
        .register_client_method("SaveWindow", move |_, method| {
            let _ = tx.send(method.args().to_vec());
        })
        .unwrap();
    session.set_ready();

    invoke_client(&session, "SaveWindow", vec![Value::Str("out.png".into())]);
    session.synchronize().unwrap();

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), vec![Value::Str("out.png".into())]);
}

#[test]
fn methods_before_ready_run_in_order_once_ready() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    let (tx, rx) = bounded(8);
    session
        .register_client_method("Step", move |_, method| {
            let _ = tx.send(method.args().first().and_then(Value::as_int));
        })
        .unwrap();

    for n in 0..3i64 {
        invoke_client(&session, "Step", vec![Value::Int(n)]);
    }
    session.synchronize().unwrap();
    assert!(rx.try_recv().is_err());

    session.set_ready();
    let seen: Vec<_> = (0..3).map(|_| rx.recv_timeout(WAIT).unwrap()).collect();
    assert_eq!(seen, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn handler_may_rendezvous() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    let (tx, rx) = bounded(1);
    session
        .register_client_method("Refresh", move |handle, _| {
            let _ = tx.send(sync_code(&handle.synchronize()));
        })
        .unwrap();
    session.set_ready();

    invoke_client(&session, "Refresh", vec![]);
    session.synchronize().unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), 0);
}

#[test]
fn query_reports_supported_methods() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect_with(SessionConfig::default().client_name("batch"));
    session.register_client_method("SaveWindow", |_, _| {}).unwrap();
    session.set_ready();

    session.invoke_rpc("QueryClient", vec![]).unwrap();
    session.synchronize().unwrap();
    // the reply precedes this tag on the wire
    session.synchronize().unwrap();

    let (name, methods) = viewer.viewer().client_information().unwrap();
    assert_eq!(name, "batch");
    assert!(methods.iter().any(|m| m == "SaveWindow"));
    assert!(methods.iter().any(|m| m == "Quit"));
}

#[test]
fn unknown_method_is_dropped() {
    let viewer = ViewerFixture::start();
    let session = viewer.connect();
    session.set_ready();

    invoke_client(&session, "NobodyHome", vec![]);
    assert_eq!(session.synchronize().unwrap(), SyncStatus::Complete);
    assert!(session.is_viewer_alive());
}
