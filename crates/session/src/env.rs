// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the session crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::backend::SyncBackendKind;

/// Viewer socket; see [`vx_wire::env::socket_path`]
pub fn socket_path() -> PathBuf {
    vx_wire::env::socket_path()
}

/// Rendezvous wait strategy (`condvar` or `polling`)
pub fn sync_backend() -> SyncBackendKind {
    std::env::var("VX_SYNC_BACKEND")
        .ok()
        .and_then(|s| SyncBackendKind::parse(&s))
        .unwrap_or_default()
}

/// Sleep between predicate checks for the polling backend
pub fn poll_interval() -> Duration {
    std::env::var("VX_POLL_INTERVAL_US")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_micros)
        .unwrap_or(Duration::from_micros(200))
}

/// Initial message suppression level
pub fn message_level() -> u8 {
    std::env::var("VX_MESSAGE_LEVEL").ok().and_then(|s| s.parse::<u8>().ok()).unwrap_or(0)
}

/// Threads running named client methods
pub fn method_workers() -> usize {
    std::env::var("VX_METHOD_WORKERS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(2)
}

/// Queued client methods beyond which new ones are dropped
pub fn method_queue() -> usize {
    std::env::var("VX_METHOD_QUEUE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(64)
}
