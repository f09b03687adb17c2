// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use crate::backend::SyncBackendKind;
use crate::env;
use crate::messages::MAX_SUPPRESSION_LEVEL;

/// Settings for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Reported to the viewer in `ClientInformation`
    pub client_name: String,
    pub backend: SyncBackendKind,
    /// Only used by [`SyncBackendKind::Polling`]
    pub poll_interval: Duration,
    /// Initial message suppression level, clamped to 0..=3
    pub message_level: u8,
    pub method_workers: usize,
    pub method_queue: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            client_name: "vx".to_string(),
            backend: SyncBackendKind::default(),
            poll_interval: Duration::from_micros(200),
            message_level: 0,
            method_workers: 2,
            method_queue: 64,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `VX_*` environment variables
    pub fn from_env() -> Self {
        Self {
            backend: env::sync_backend(),
            poll_interval: env::poll_interval(),
            message_level: env::message_level().min(MAX_SUPPRESSION_LEVEL),
            method_workers: env::method_workers(),
            method_queue: env::method_queue(),
            ..Self::default()
        }
    }

    vx_core::setters! {
        into {
            client_name: String,
        }
        set {
            backend: SyncBackendKind,
            poll_interval: Duration,
            message_level: u8,
            method_workers: usize,
            method_queue: usize,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
