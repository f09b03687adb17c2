// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trace of outgoing state changes, for replaying a session.
//!
//! Rendezvous traffic is bookkeeping rather than user intent, so the log
//! is suspended around it.

use tracing::info;
use vx_core::StateUpdate;

pub const TARGET: &str = "vx_session::command_log";

#[derive(Debug, Default)]
pub(crate) struct CommandLog {
    suspended: u32,
    recorded: u64,
}

impl CommandLog {
    pub(crate) fn suspend(&mut self) {
        self.suspended += 1;
    }

    pub(crate) fn resume(&mut self) {
        self.suspended = self.suspended.saturating_sub(1);
    }

    pub(crate) fn is_suspended(&self) -> bool {
        self.suspended > 0
    }

    pub(crate) fn recorded(&self) -> u64 {
        self.recorded
    }

    pub(crate) fn record(&mut self, update: &StateUpdate) {
        if self.is_suspended() {
            return;
        }
        self.recorded += 1;
        let fields: Vec<String> = update.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        info!(target: TARGET, tag = %update.tag, fields = %fields.join(" "), "notify");
    }
}
