// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::backend::SyncBackend;
use crate::state::SessionState;

/// Flags the listener reads without taking the session mutex
#[derive(Debug)]
pub(crate) struct ListenerFlags {
    keep_running: AtomicBool,
    blocked_on_read: AtomicBool,
}

impl ListenerFlags {
    fn new() -> Self {
        Self { keep_running: AtomicBool::new(true), blocked_on_read: AtomicBool::new(false) }
    }

    pub(crate) fn keep_running(&self) -> bool {
        self.keep_running.load(Ordering::SeqCst)
    }

    /// Returns whether the listener was still meant to be running
    pub(crate) fn stop(&self) -> bool {
        self.keep_running.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn set_blocked_on_read(&self, blocked: bool) {
        self.blocked_on_read.store(blocked, Ordering::SeqCst);
    }

    pub(crate) fn blocked_on_read(&self) -> bool {
        self.blocked_on_read.load(Ordering::SeqCst)
    }
}

/// State shared by the control thread, the listener and method workers
pub(crate) struct Shared {
    pub(crate) state: Mutex<SessionState>,
    pub(crate) backend: SyncBackend,
    pub(crate) flags: ListenerFlags,
}

impl Shared {
    pub(crate) fn new(state: SessionState, backend: SyncBackend) -> Self {
        Self { state: Mutex::new(state), backend, flags: ListenerFlags::new() }
    }

    /// The viewer is gone: stop listening and release every waiter.
    pub(crate) fn connection_lost(&self) {
        self.flags.stop();
        let mut state = self.state.lock();
        state.viewer_dead = true;
        self.backend.notify_all();
    }

    /// Final act of the listener thread. Waiters can no longer be answered.
    pub(crate) fn listener_exited(&self) {
        let mut state = self.state.lock();
        state.listener_exited = true;
        self.backend.notify_all();
    }
}
