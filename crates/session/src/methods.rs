// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client methods requested by the viewer.
//!
//! Until the control process declares itself ready, every method is
//! buffered. The transition drains the buffer in arrival order on the
//! caller's thread; after that, methods execute as they arrive.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};
use vx_core::method::{builtin_method_names, INTERRUPT, QUERY_CLIENT_INFORMATION, QUIT};
use vx_core::ClientMethod;

use crate::error::SessionError;
use crate::session::SessionHandle;
use crate::workers::JobQueue;

/// Runs a named client method. Called without the session mutex held.
pub type MethodHandler = Arc<dyn Fn(&SessionHandle, &ClientMethod) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Buffering everything
    NotReady,
    /// Emptying the buffer; new arrivals still queue behind it
    Draining,
    Ready,
}

pub(crate) enum Received {
    Buffered,
    Execute(ClientMethod),
}

/// Work left over once the session mutex is released
pub(crate) enum Deferred {
    Quit(Option<MethodHandler>),
    Invoke { handler: MethodHandler, method: ClientMethod },
}

/// Where deferred work runs
pub(crate) enum Placement<'a> {
    /// On the current thread
    Inline,
    /// On the worker pool
    Pool(&'a JobQueue),
}

pub(crate) struct MethodChannel {
    mode: ChannelMode,
    pending: VecDeque<ClientMethod>,
    handlers: IndexMap<String, MethodHandler>,
}

impl MethodChannel {
    pub(crate) fn new() -> Self {
        Self { mode: ChannelMode::NotReady, pending: VecDeque::new(), handlers: IndexMap::new() }
    }

    pub(crate) fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// `Quit` may carry a handler, run after the quit is recorded. The
    /// other built-ins are handled entirely by the session.
    pub(crate) fn register(&mut self, name: &str, handler: MethodHandler) -> Result<(), SessionError> {
        if name == INTERRUPT || name == QUERY_CLIENT_INFORMATION {
            return Err(SessionError::ReservedMethod(name.to_string()));
        }
        if self.handlers.insert(name.to_string(), handler).is_some() {
            debug!(method = name, "replaced client method handler");
        }
        Ok(())
    }

    pub(crate) fn unregister(&mut self, name: &str) -> bool {
        self.handlers.shift_remove(name).is_some()
    }

    pub(crate) fn handler(&self, name: &str) -> Option<MethodHandler> {
        self.handlers.get(name).cloned()
    }

    /// Names advertised in `ClientInformation`
    pub(crate) fn supported(&self) -> Vec<String> {
        let mut names: Vec<String> = builtin_method_names().iter().map(|s| s.to_string()).collect();
        names.extend(self.handlers.keys().filter(|name| name.as_str() != QUIT).cloned());
        names
    }

    pub(crate) fn receive(&mut self, method: ClientMethod) -> Received {
        if self.mode == ChannelMode::Ready {
            return Received::Execute(method);
        }
        debug!(method = method.name(), mode = ?self.mode, "buffering client method");
        self.pending.push_back(method);
        Received::Buffered
    }

    /// Start draining. False if the channel already left `NotReady`.
    pub(crate) fn begin_drain(&mut self) -> bool {
        if self.mode != ChannelMode::NotReady {
            return false;
        }
        info!(buffered = self.pending.len(), "client methods ready");
        self.mode = ChannelMode::Draining;
        true
    }

    /// Next buffered method; switches to `Ready` once the buffer is empty.
    pub(crate) fn next_buffered(&mut self) -> Option<ClientMethod> {
        let next = self.pending.pop_front();
        if next.is_none() {
            self.mode = ChannelMode::Ready;
        }
        next
    }
}

pub(crate) fn run_deferred(handle: &SessionHandle, deferred: Deferred, placement: Placement<'_>) {
    match deferred {
        Deferred::Quit(handler) => {
            info!("viewer requested quit");
            // handlers run on the listener, so their rendezvous must fail fast
            handle.stop_listening();
            if let Some(handler) = handler {
                handler(handle, &ClientMethod::Quit);
            }
        }
        Deferred::Invoke { handler, method } => match placement {
            Placement::Inline => handler(handle, &method),
            Placement::Pool(queue) => {
                let handle = handle.clone();
                let name = method.name().to_string();
                queue.submit(&name, Box::new(move || handler(&handle, &method)));
            }
        },
    }
}

#[cfg(test)]
#[path = "methods_tests.rs"]
mod tests;
