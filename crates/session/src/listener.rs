// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener thread: reads frames from the viewer and routes them.
//!
//! The thread blocks in `needs_read` without the session mutex until a whole
//! frame is buffered, then takes the mutex to read and apply it. Work that must not run under the
//! mutex (quit, client-method handlers) happens after it is released.

use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};
use vx_wire::Frame;

use crate::backend::SyncBackend;
use crate::connection::FrameReader;
use crate::error::SessionError;
use crate::methods::{run_deferred, Deferred, Placement};
use crate::session::SessionHandle;
use crate::shared::Shared;
use crate::state::SessionState;
use crate::workers::JobQueue;

pub(crate) fn spawn(
    handle: SessionHandle,
    reader: Box<dyn FrameReader>,
    queue: JobQueue,
) -> Result<JoinHandle<()>, SessionError> {
    thread::Builder::new()
        .name("vx-listener".to_string())
        .spawn(move || run(&handle, reader, &queue))
        .map_err(|source| SessionError::Spawn { what: "listener", source })
}

fn run(handle: &SessionHandle, mut reader: Box<dyn FrameReader>, queue: &JobQueue) {
    let shared = handle.shared();
    debug!("listener started");

    while shared.flags.keep_running() {
        shared.flags.set_blocked_on_read(true);
        let ready = reader.needs_read(true);
        shared.flags.set_blocked_on_read(false);

        match ready {
            Ok(true) => {}
            Ok(false) => {
                lost(shared, "viewer closed the connection");
                break;
            }
            Err(e) => {
                lost(shared, &e.to_string());
                break;
            }
        }
        if !shared.flags.keep_running() {
            break;
        }

        let mut detached = false;
        let deferred = {
            let mut state = shared.state.lock();
            match reader.read_frame() {
                Ok(frame) => {
                    detached = matches!(frame, Frame::Detach);
                    handle_frame(&mut state, &shared.backend, frame)
                }
                Err(e) if e.is_lost() => {
                    drop(state);
                    lost(shared, &e.to_string());
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "discarding unreadable frame from viewer");
                    None
                }
            }
        };
        if let Some(deferred) = deferred {
            run_deferred(handle, deferred, Placement::Pool(queue));
        }
        if detached {
            shared.flags.stop();
            break;
        }
    }

    shared.listener_exited();
    debug!("listener exiting");
}

fn handle_frame(state: &mut SessionState, backend: &SyncBackend, frame: Frame) -> Option<Deferred> {
    match frame {
        Frame::Update { update } => {
            let dispatch = state.dispatch(&update);
            if dispatch.wake {
                backend.notify_all();
            }
            dispatch.deferred
        }
        Frame::Hello { version } => {
            debug!(%version, "ignoring repeated hello");
            None
        }
        Frame::Detach => {
            info!("viewer is detaching");
            state.viewer_dead = true;
            backend.notify_all();
            None
        }
    }
}

fn lost(shared: &Shared, reason: &str) {
    if shared.flags.keep_running() {
        warn!(%reason, "lost connection to viewer");
    } else {
        debug!(%reason, "listener stopped");
    }
    shared.connection_lost();
}
