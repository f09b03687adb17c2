// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vx-session: the control process's side of a viewer connection.
//!
//! A [`Session`] owns a listener thread that applies state updates pushed
//! by the viewer, a rendezvous ([`SessionHandle::synchronize`]) that blocks
//! until the viewer has caught up, and a channel through which the viewer
//! asks the control process to run client methods.

pub mod backend;
pub mod command_log;
pub mod config;
pub mod connection;
pub mod env;
pub mod error;
pub mod messages;
pub mod methods;
pub mod rendezvous;
pub mod session;
pub mod transport;

mod listener;
mod shared;
mod state;
mod workers;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use backend::SyncBackendKind;
pub use config::SessionConfig;
pub use connection::{Connection, FrameReader, FrameWriter};
pub use error::{sync_code, ConnectionError, SessionError, SyncError, SyncStatus};
pub use messages::{MemorySink, MessageSink, StderrSink, MAX_SUPPRESSION_LEVEL};
pub use methods::{ChannelMode, MethodHandler};
pub use rendezvous::SYNC_SENTINEL;
pub use session::{Session, SessionGuard, SessionHandle};
pub use transport::{Endpoint, SocketConnection};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{AutoViewer, FakeViewer, MemoryConnection};
