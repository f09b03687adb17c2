// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization rendezvous.
//!
//! The control thread sends a fresh tag in `SyncAttributes` and blocks
//! until the viewer echoes that same tag, which it does only after
//! processing everything sent before it. Echoes of older tags are stale
//! and ignored.

use tracing::{debug, trace};
use vx_core::tag::SYNC_ATTRIBUTES;
use vx_core::fields;

use crate::error::{SessionError, SyncError, SyncStatus, INTERRUPTED, VIEWER_TERMINATED};
use crate::session::SessionHandle;
use crate::state::SessionState;

/// Value left in `SyncAttributes.sync_tag` between rendezvous
pub const SYNC_SENTINEL: i64 = -1;

/// Tags sent and echoes accepted. Tags start at 1 and only grow.
#[derive(Debug, Default)]
pub(crate) struct SyncTracker {
    last_sent: i64,
    acknowledged: i64,
}

impl SyncTracker {
    pub(crate) fn next_tag(&mut self) -> i64 {
        self.last_sent += 1;
        self.last_sent
    }

    pub(crate) fn last_sent(&self) -> i64 {
        self.last_sent
    }

    /// Accept `echoed` only if it is the most recently sent tag.
    pub(crate) fn observe(&mut self, echoed: i64) -> bool {
        if echoed != self.last_sent || echoed <= self.acknowledged {
            return false;
        }
        self.acknowledged = echoed;
        true
    }

    /// The viewer has caught up with `tag` or a later one
    pub(crate) fn reached(&self, tag: i64) -> bool {
        self.acknowledged >= tag
    }
}

impl SessionState {
    fn send_sync_tag(&mut self) -> Result<i64, SessionError> {
        let tag = self.sync.next_tag();
        self.registry.require_mut(SYNC_ATTRIBUTES)?.set(fields::SYNC_TAG, tag)?;
        self.notify(SYNC_ATTRIBUTES)?;
        self.registry.require_mut(SYNC_ATTRIBUTES)?.store(fields::SYNC_TAG, SYNC_SENTINEL)?;
        Ok(tag)
    }

    fn finish_sync(&mut self, tag: i64) -> Result<SyncStatus, SyncError> {
        if !self.sync.reached(tag) {
            self.last_error = Some(VIEWER_TERMINATED.to_string());
            return Err(SyncError::ViewerTerminated);
        }
        if std::mem::take(&mut self.interrupted) {
            self.last_error = Some(INTERRUPTED.to_string());
            return Err(SyncError::Interrupted);
        }
        match self.messages.take_error() {
            Some(message) => {
                self.last_error = Some(message.clone());
                Ok(SyncStatus::ViewerError { message })
            }
            None => Ok(SyncStatus::Complete),
        }
    }
}

impl SessionHandle {
    /// Block until the viewer has processed everything sent so far.
    ///
    /// Must not be called while holding a [`SessionGuard`](crate::SessionGuard)
    /// on the same thread.
    pub fn synchronize(&self) -> Result<SyncStatus, SyncError> {
        let shared = self.shared();
        let mut state = shared.state.lock();
        if !shared.flags.keep_running() || state.viewer_dead {
            state.last_error = Some(VIEWER_TERMINATED.to_string());
            return Err(SyncError::ViewerTerminated);
        }

        state.command_log.suspend();
        let tag = match state.send_sync_tag() {
            Ok(tag) => tag,
            Err(e) => {
                state.command_log.resume();
                state.last_error = Some(e.to_string());
                return Err(SyncError::Send(e));
            }
        };
        trace!(tag, "waiting for sync echo");
        shared.backend.wait_until(&mut state, |s| s.sync.reached(tag) || s.viewer_dead || s.listener_exited);
        state.command_log.resume();

        let result = state.finish_sync(tag);
        debug!(tag, code = crate::error::sync_code(&result), "rendezvous finished");
        result
    }
}

#[cfg(test)]
#[path = "rendezvous_tests.rs"]
mod tests;
