// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::*;

#[yare::parameterized(
    condvar = { "condvar", Some(SyncBackendKind::Condvar) },
    polling = { "polling", Some(SyncBackendKind::Polling) },
    poll    = { " Poll ",  Some(SyncBackendKind::Polling) },
    bogus   = { "spin",    None },
)]
fn parses_backend_names(raw: &str, expected: Option<SyncBackendKind>) {
    assert_eq!(SyncBackendKind::parse(raw), expected);
}

#[test]
fn condvar_is_the_default() {
    assert_eq!(SyncBackendKind::default(), SyncBackendKind::Condvar);
}

#[yare::parameterized(
    condvar = { SyncBackendKind::Condvar },
    polling = { SyncBackendKind::Polling },
)]
fn waiter_wakes_when_predicate_flips(kind: SyncBackendKind) {
    let state = Arc::new((Mutex::new(false), SyncBackend::new(kind, Duration::from_micros(50))));

    let signaller = {
        let state = Arc::clone(&state);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            *state.0.lock() = true;
            state.1.notify_all();
        })
    };

    let mut guard = state.0.lock();
    state.1.wait_until(&mut guard, |done| *done);
    assert!(*guard);
    drop(guard);
    signaller.join().unwrap();
}

#[test]
fn satisfied_predicate_returns_without_waiting() {
    let lock = Mutex::new(3);
    let backend = SyncBackend::new(SyncBackendKind::Condvar, Duration::ZERO);
    let mut guard = lock.lock();
    backend.wait_until(&mut guard, |n| *n == 3);
    assert_eq!(*guard, 3);
}

#[test]
fn polling_releases_the_mutex_between_checks() {
    let state = Arc::new((Mutex::new(0u32), SyncBackend::new(SyncBackendKind::Polling, Duration::ZERO)));

    let bumper = {
        let state = Arc::clone(&state);
        std::thread::spawn(move || {
            for _ in 0..5 {
                *state.0.lock() += 1;
            }
        })
    };

    let mut guard = state.0.lock();
    state.1.wait_until(&mut guard, |n| *n >= 5);
    assert_eq!(*guard, 5);
    drop(guard);
    bumper.join().unwrap();
}
