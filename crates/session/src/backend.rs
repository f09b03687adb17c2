// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! How a rendezvous waits for the listener thread.
//!
//! Both strategies wait on a predicate evaluated under the session mutex,
//! so a wakeup signalled between the check and the wait is never lost.

use std::thread;
use std::time::Duration;

use parking_lot::{Condvar, MutexGuard};

/// Configured wait strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncBackendKind {
    /// Block on a condition variable signalled by the listener
    #[default]
    Condvar,
    /// Release the mutex, sleep briefly, re-check
    Polling,
}

vx_core::simple_display! {
    SyncBackendKind {
        Condvar => "condvar",
        Polling => "polling",
    }
}

impl SyncBackendKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "condvar" => Some(SyncBackendKind::Condvar),
            "polling" | "poll" => Some(SyncBackendKind::Polling),
            _ => None,
        }
    }
}

pub(crate) enum SyncBackend {
    Condvar(Condvar),
    Polling { interval: Duration },
}

impl SyncBackend {
    pub(crate) fn new(kind: SyncBackendKind, interval: Duration) -> Self {
        match kind {
            SyncBackendKind::Condvar => SyncBackend::Condvar(Condvar::new()),
            SyncBackendKind::Polling => SyncBackend::Polling { interval },
        }
    }

    /// Block until `done` holds. The guard is released while waiting and
    /// held again when this returns.
    pub(crate) fn wait_until<T>(&self, guard: &mut MutexGuard<'_, T>, mut done: impl FnMut(&T) -> bool) {
        match self {
            SyncBackend::Condvar(condvar) => {
                while !done(&**guard) {
                    condvar.wait(guard);
                }
            }
            SyncBackend::Polling { interval } => {
                while !done(&**guard) {
                    MutexGuard::unlocked(guard, || {
                        if interval.is_zero() {
                            thread::yield_now();
                        } else {
                            thread::sleep(*interval);
                        }
                    });
                }
            }
        }
    }

    /// Wake every waiter. Callers hold the session mutex or have just
    /// changed the predicate under it.
    pub(crate) fn notify_all(&self) {
        if let SyncBackend::Condvar(condvar) = self {
            condvar.notify_all();
        }
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
