// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle and the handle shared with method handlers.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, info};
use vx_core::tag::VIEWER_RPC;
use vx_core::{fields, ClientMethod, ObjectTag, StateError, StateObject, StatusRecord, Value};
use vx_wire::{Frame, PROTOCOL_VERSION};

use crate::backend::SyncBackend;
use crate::config::SessionConfig;
use crate::connection::{Connection, FrameReader, FrameWriter};
use crate::error::{ConnectionError, SessionError};
use crate::listener;
use crate::messages::{MessageSink, StderrSink};
use crate::methods::{run_deferred, ChannelMode, MethodHandler, Placement};
use crate::shared::Shared;
use crate::state::SessionState;
use crate::transport::{Endpoint, SocketConnection};
use crate::workers::WorkerPool;

/// Cloneable access to a running session.
///
/// Client-method handlers receive one of these; it can lock the session,
/// send updates and rendezvous, but not tear the session down.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl SessionHandle {
    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    pub(crate) fn stop_listening(&self) {
        self.shared.flags.stop();
    }

    /// Take the session mutex. The listener stalls until the guard drops.
    pub fn lock(&self) -> SessionGuard<'_> {
        SessionGuard { state: self.shared.state.lock() }
    }

    /// Modify one object and send the fields `edit` selected.
    pub fn update(
        &self,
        tag: &str,
        edit: impl FnOnce(&mut StateObject) -> Result<(), StateError>,
    ) -> Result<(), SessionError> {
        let mut guard = self.lock();
        edit(guard.object_mut(tag)?)?;
        guard.notify(tag)
    }

    /// Ask the viewer to run `name` with `args`.
    pub fn invoke_rpc(&self, name: &str, args: Vec<Value>) -> Result<(), SessionError> {
        self.update(VIEWER_RPC, |rpc| {
            rpc.set(fields::RPC, name)?;
            rpc.set(fields::ARGS, args)
        })
    }

    /// Call `callback` with the object each time the viewer updates `tag`.
    ///
    /// Callbacks run on the listener thread with the session mutex held and
    /// must not call back into the session.
    pub fn on_update(&self, tag: impl Into<ObjectTag>, callback: impl FnMut(&StateObject) + Send + 'static) {
        self.shared.state.lock().add_observer(tag.into(), Box::new(callback));
    }

    pub fn register_client_method(
        &self,
        name: &str,
        handler: impl Fn(&SessionHandle, &ClientMethod) + Send + Sync + 'static,
    ) -> Result<(), SessionError> {
        let handler: MethodHandler = Arc::new(handler);
        self.shared.state.lock().methods.register(name, handler)
    }

    pub fn unregister_client_method(&self, name: &str) -> bool {
        self.shared.state.lock().methods.unregister(name)
    }

    /// Stop buffering client methods.
    ///
    /// Buffered methods run on the calling thread in arrival order, each
    /// finishing before the next starts. Later calls do nothing.
    pub fn set_ready(&self) {
        if !self.shared.state.lock().methods.begin_drain() {
            return;
        }
        loop {
            let deferred = {
                let mut state = self.shared.state.lock();
                match state.methods.next_buffered() {
                    Some(method) => state.execute_method(method),
                    None => break,
                }
            };
            if let Some(deferred) = deferred {
                run_deferred(self, deferred, Placement::Inline);
            }
        }
    }

    pub fn method_channel_mode(&self) -> ChannelMode {
        self.shared.state.lock().methods.mode()
    }

    /// Set the suppression level, clamped to 0..=3; returns the level applied.
    pub fn set_message_suppression_level(&self, level: u8) -> u8 {
        let mut state = self.shared.state.lock();
        state.messages.set_level(level);
        state.messages.level()
    }

    pub fn message_suppression_level(&self) -> u8 {
        self.shared.state.lock().messages.level()
    }

    pub fn set_message_sink(&self, sink: impl MessageSink + 'static) {
        self.shared.state.lock().messages.set_sink(Box::new(sink));
    }

    pub fn latest_message(&self) -> Option<StatusRecord> {
        self.shared.state.lock().messages.latest().cloned()
    }

    /// Whether the viewer reported an error the next rendezvous will return
    pub fn error_pending(&self) -> bool {
        self.shared.state.lock().messages.error_pending()
    }

    /// Text of the viewer's most recent error, kept after it is cleared
    pub fn last_viewer_error(&self) -> Option<String> {
        self.shared.state.lock().messages.error_text().map(str::to_string)
    }

    /// Updates written to the command log so far
    pub fn logged_commands(&self) -> u64 {
        self.shared.state.lock().command_log.recorded()
    }

    /// Message from the most recent failed rendezvous
    pub fn last_error(&self) -> Option<String> {
        self.shared.state.lock().last_error.clone()
    }

    pub fn is_viewer_alive(&self) -> bool {
        self.shared.flags.keep_running() && !self.shared.state.lock().viewer_dead
    }

    /// Whether the viewer sent `Quit`
    pub fn quit_requested(&self) -> bool {
        self.shared.state.lock().quit_requested
    }

    pub fn interrupt_pending(&self) -> bool {
        self.shared.state.lock().interrupted
    }
}

/// Scoped hold on the session mutex
pub struct SessionGuard<'a> {
    state: MutexGuard<'a, SessionState>,
}

impl SessionGuard<'_> {
    pub fn object(&self, tag: &str) -> Option<&StateObject> {
        self.state.registry.get(tag)
    }

    pub fn get(&self, tag: &str, field: &str) -> Option<&Value> {
        self.object(tag)?.get(field)
    }

    pub fn object_mut(&mut self, tag: &str) -> Result<&mut StateObject, SessionError> {
        Ok(self.state.registry.require_mut(tag)?)
    }

    pub fn set(&mut self, tag: &str, field: &str, value: impl Into<Value>) -> Result<(), SessionError> {
        Ok(self.object_mut(tag)?.set(field, value)?)
    }

    /// Send the selected fields of `tag` to the viewer
    pub fn notify(&mut self, tag: &str) -> Result<(), SessionError> {
        self.state.notify(tag)
    }

    /// Add an application-defined object
    pub fn declare(&mut self, object: StateObject) {
        self.state.registry.declare(object);
    }

    pub fn tags(&self) -> Vec<ObjectTag> {
        self.state.registry.tags().cloned().collect()
    }
}

/// A live connection to a viewer.
///
/// Dereferences to [`SessionHandle`]. Dropping it shuts it down.
pub struct Session {
    handle: SessionHandle,
    shut_down: AtomicBool,
    threads: Mutex<Threads>,
}

struct Threads {
    listener: Option<JoinHandle<()>>,
    workers: Option<WorkerPool>,
}

impl Session {
    /// Connect over a socket, per the endpoint.
    pub fn connect_endpoint(config: SessionConfig, endpoint: &Endpoint) -> Result<Self, SessionError> {
        Self::connect(config, SocketConnection::connect(endpoint)?)
    }

    /// Handshake over `connection` and start the listener. Visible messages
    /// go to stderr.
    pub fn connect(config: SessionConfig, connection: impl Connection + 'static) -> Result<Self, SessionError> {
        Self::connect_with_sink(config, connection, StderrSink)
    }

    pub fn connect_with_sink(
        config: SessionConfig,
        connection: impl Connection + 'static,
        sink: impl MessageSink + 'static,
    ) -> Result<Self, SessionError> {
        let (mut reader, mut writer) = Box::new(connection).split()?;
        handshake(reader.as_mut(), writer.as_mut())?;

        let state = SessionState::new(writer, config.client_name.clone(), config.message_level, Box::new(sink));
        let backend = SyncBackend::new(config.backend, config.poll_interval);
        let handle = SessionHandle { shared: Arc::new(Shared::new(state, backend)) };

        let mut workers = WorkerPool::start(config.method_workers, config.method_queue)?;
        let listener = match listener::spawn(handle.clone(), reader, workers.queue()) {
            Ok(listener) => listener,
            Err(e) => {
                workers.shutdown();
                return Err(e);
            }
        };

        info!(client = %config.client_name, backend = %config.backend, "session started");
        Ok(Self {
            handle,
            shut_down: AtomicBool::new(false),
            threads: Mutex::new(Threads { listener: Some(listener), workers: Some(workers) }),
        })
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Detach from the viewer and stop every session thread.
    ///
    /// Safe to call more than once and from the listener thread.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let shared = self.handle.shared();
        shared.flags.stop();

        {
            let mut state = shared.state.lock();
            if !state.quit_requested && !state.viewer_dead {
                match state.send(&Frame::Detach) {
                    Ok(()) => debug!("detached from viewer"),
                    Err(e) => debug!(error = %e, "detach not delivered"),
                }
            }
            if shared.flags.blocked_on_read() {
                debug!("listener blocked on read, closing transport");
            }
            // unblocks the listener if it re-entered a read after the stop
            state.close_transport();
        }

        let (listener, workers) = {
            let mut threads = self.threads.lock();
            (threads.listener.take(), threads.workers.take())
        };
        if let Some(listener) = listener {
            if listener.thread().id() == thread::current().id() {
                debug!("shutdown on listener thread, not joining it");
            } else if listener.join().is_err() {
                error!("listener thread panicked");
            }
        }
        if let Some(mut workers) = workers {
            workers.shutdown();
        }
        info!("session closed");
    }
}

impl Deref for Session {
    type Target = SessionHandle;

    fn deref(&self) -> &SessionHandle {
        &self.handle
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handshake(reader: &mut dyn FrameReader, writer: &mut dyn FrameWriter) -> Result<(), ConnectionError> {
    writer.write_frame(&Frame::hello())?;
    if !reader.needs_read(true)? {
        return Err(ConnectionError::Lost);
    }
    match reader.read_frame()? {
        Frame::Hello { version } if version == PROTOCOL_VERSION => Ok(()),
        Frame::Hello { version } => {
            Err(ConnectionError::Handshake(format!("viewer speaks {}, expected {}", version, PROTOCOL_VERSION)))
        }
        other => Err(ConnectionError::Handshake(format!("expected hello, got {}", other.kind()))),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
