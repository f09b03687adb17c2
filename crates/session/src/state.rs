// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Everything guarded by the session mutex.
//!
//! Both the control thread and the listener thread mutate this; neither
//! touches it without holding the lock.

use tracing::{debug, warn};
use vx_core::tag::{CLIENT_INFORMATION, CLIENT_METHOD, MESSAGE_ATTRIBUTES, SYNC_ATTRIBUTES};
use vx_core::{fields, ClientMethod, ObjectTag, StateObject, StateRegistry, StateUpdate, StatusRecord, Value};
use vx_wire::Frame;

use crate::command_log::CommandLog;
use crate::connection::FrameWriter;
use crate::error::{ConnectionError, SessionError};
use crate::messages::{MessageObserver, MessageSink};
use crate::methods::{Deferred, MethodChannel, Received};
use crate::rendezvous::SyncTracker;

pub(crate) type ObserverFn = Box<dyn FnMut(&StateObject) + Send>;

struct Observer {
    tag: ObjectTag,
    callback: ObserverFn,
}

/// What the listener does after applying one incoming update
#[derive(Default)]
pub(crate) struct Dispatch {
    /// A rendezvous waiter may now be satisfied
    pub(crate) wake: bool,
    pub(crate) deferred: Option<Deferred>,
}

pub(crate) struct SessionState {
    pub(crate) registry: StateRegistry,
    observers: Vec<Observer>,
    writer: Box<dyn FrameWriter>,
    pub(crate) sync: SyncTracker,
    pub(crate) methods: MethodChannel,
    pub(crate) messages: MessageObserver,
    pub(crate) command_log: CommandLog,
    pub(crate) client_name: String,
    pub(crate) interrupted: bool,
    pub(crate) viewer_dead: bool,
    pub(crate) listener_exited: bool,
    pub(crate) quit_requested: bool,
    pub(crate) last_error: Option<String>,
}

impl SessionState {
    pub(crate) fn new(
        writer: Box<dyn FrameWriter>,
        client_name: String,
        message_level: u8,
        sink: Box<dyn MessageSink>,
    ) -> Self {
        Self {
            registry: StateRegistry::with_builtins(),
            observers: Vec::new(),
            writer,
            sync: SyncTracker::default(),
            methods: MethodChannel::new(),
            messages: MessageObserver::new(message_level, sink),
            command_log: CommandLog::default(),
            client_name,
            interrupted: false,
            viewer_dead: false,
            listener_exited: false,
            quit_requested: false,
            last_error: None,
        }
    }

    pub(crate) fn add_observer(&mut self, tag: ObjectTag, callback: ObserverFn) {
        self.observers.push(Observer { tag, callback });
    }

    // ── Outgoing ────────────────────────────────────────────────────────

    /// Send the selected fields of `tag` and unselect them. Nothing is sent
    /// when no field is selected.
    pub(crate) fn notify(&mut self, tag: &str) -> Result<(), SessionError> {
        let update = self.registry.require_mut(tag)?.take_update();
        if update.is_empty() {
            debug!(%tag, "notify with nothing selected");
            return Ok(());
        }
        self.command_log.record(&update);
        self.send(&Frame::update(update))?;
        Ok(())
    }

    pub(crate) fn send(&mut self, frame: &Frame) -> Result<(), ConnectionError> {
        if self.viewer_dead {
            return Err(ConnectionError::Lost);
        }
        let result = self.writer.write_frame(frame);
        if let Err(e) = &result {
            if e.is_lost() {
                warn!(error = %e, frame = frame.kind(), "write to viewer failed");
                self.viewer_dead = true;
            }
        }
        result
    }

    pub(crate) fn close_transport(&mut self) {
        self.writer.close();
    }

    // ── Incoming ────────────────────────────────────────────────────────

    /// Apply one update from the viewer and route it.
    pub(crate) fn dispatch(&mut self, update: &StateUpdate) -> Dispatch {
        let object = match self.registry.apply(update) {
            Ok(object) => object,
            Err(e) => {
                warn!(tag = %update.tag, error = %e, "dropping update from viewer");
                return Dispatch::default();
            }
        };

        let incoming = match update.tag.as_str() {
            SYNC_ATTRIBUTES => Incoming::SyncEcho(object.int(fields::SYNC_TAG)),
            MESSAGE_ATTRIBUTES => Incoming::Status(StatusRecord::from_object(object)),
            CLIENT_METHOD => Incoming::Method(ClientMethod::from_object(object)),
            _ => Incoming::Other,
        };
        for observer in self.observers.iter_mut().filter(|o| o.tag == update.tag) {
            (observer.callback)(object);
        }

        let mut outcome = Dispatch::default();
        match incoming {
            Incoming::SyncEcho(Ok(echoed)) => {
                outcome.wake = self.sync.observe(echoed);
                if !outcome.wake {
                    debug!(echoed, awaiting = self.sync.last_sent(), "ignoring stale sync echo");
                }
            }
            Incoming::Status(Ok(record)) => self.messages.observe(record),
            Incoming::Method(Ok(method)) => {
                if let Received::Execute(method) = self.methods.receive(method) {
                    outcome.deferred = self.execute_method(method);
                }
            }
            Incoming::SyncEcho(Err(e)) | Incoming::Status(Err(e)) | Incoming::Method(Err(e)) => {
                warn!(tag = %update.tag, error = %e, "malformed update from viewer");
            }
            Incoming::Other => {}
        }
        outcome
    }

    /// Run the part of a client method that needs the lock. Anything that
    /// must run unlocked comes back as [`Deferred`].
    pub(crate) fn execute_method(&mut self, method: ClientMethod) -> Option<Deferred> {
        match method {
            ClientMethod::Interrupt => {
                debug!("interrupt requested");
                self.interrupted = true;
                None
            }
            ClientMethod::QueryClientInformation => {
                if let Err(e) = self.reply_client_information() {
                    warn!(error = %e, "failed to send client information");
                }
                None
            }
            ClientMethod::Quit => {
                self.quit_requested = true;
                Some(Deferred::Quit(self.methods.handler(vx_core::method::QUIT)))
            }
            ClientMethod::Named { .. } => match self.methods.handler(method.name()) {
                Some(handler) => Some(Deferred::Invoke { handler, method }),
                None => {
                    debug!(method = method.name(), "no handler for client method, dropping");
                    None
                }
            },
        }
    }

    fn reply_client_information(&mut self) -> Result<(), SessionError> {
        let methods: Vec<Value> = self.methods.supported().into_iter().map(Value::Str).collect();
        let info = self.registry.require_mut(CLIENT_INFORMATION)?;
        info.set(fields::CLIENT_NAME, self.client_name.as_str())?;
        info.set(fields::METHODS, methods)?;
        self.notify(CLIENT_INFORMATION)
    }
}

enum Incoming {
    SyncEcho(Result<i64, vx_core::StateError>),
    Status(Result<StatusRecord, vx_core::StateError>),
    Method(Result<ClientMethod, vx_core::StateError>),
    Other,
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
