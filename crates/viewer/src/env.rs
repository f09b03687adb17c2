// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the viewer crate.

use std::path::PathBuf;
use std::time::Duration;

pub fn socket_path() -> PathBuf {
    vx_wire::env::socket_path()
}

/// Delay before echoing a sync tag (default none, `VX_ECHO_DELAY_MS`)
pub fn echo_delay() -> Duration {
    std::env::var("VX_ECHO_DELAY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::ZERO)
}

/// Time allowed for a client to send its first frame
pub fn hello_timeout() -> Duration {
    std::env::var("VX_HELLO_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}
