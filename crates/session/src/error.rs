// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session error types

use std::io;

use thiserror::Error;
use vx_core::StateError;
use vx_wire::ProtocolError;

/// Message recorded when a rendezvous finds the viewer gone
pub const VIEWER_TERMINATED: &str = "viewer has terminated abnormally";

/// Message recorded when a rendezvous is unwound by an interrupt
pub const INTERRUPTED: &str = "interrupted";

/// Errors from the transport to the viewer
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("lost connection to viewer")]
    Lost,

    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ConnectionError {
    /// True when the stream can no longer be used.
    ///
    /// A payload that fails to decode leaves the framing intact, so that
    /// case is recoverable; an oversized prefix is not.
    pub fn is_lost(&self) -> bool {
        match self {
            ConnectionError::Lost => true,
            ConnectionError::Protocol(ProtocolError::FrameTooLarge(_)) => true,
            ConnectionError::Protocol(e) => e.is_disconnect(),
            ConnectionError::Connect { .. } | ConnectionError::Handshake(_) => false,
        }
    }
}

/// Errors from session operations other than the rendezvous
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("client method '{0}' is handled by the session itself")]
    ReservedMethod(String),

    #[error("failed to start {what} thread: {source}")]
    Spawn {
        what: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Why a rendezvous could not complete
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{}", VIEWER_TERMINATED)]
    ViewerTerminated,

    #[error("{}", INTERRUPTED)]
    Interrupted,

    #[error("failed to send sync tag: {0}")]
    Send(#[from] SessionError),
}

impl SyncError {
    /// Integer status: -1 for a dead viewer or an interrupt, 1 otherwise
    pub fn code(&self) -> i32 {
        match self {
            SyncError::ViewerTerminated | SyncError::Interrupted => -1,
            SyncError::Send(SessionError::Connection(e)) if e.is_lost() => -1,
            SyncError::Send(_) => 1,
        }
    }
}

/// Outcome of a rendezvous that reached the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The viewer processed everything sent before the rendezvous
    Complete,
    /// The viewer reported an error since the previous rendezvous
    ViewerError { message: String },
}

impl SyncStatus {
    /// Integer status: 0 on success, 1 on a viewer error
    pub fn code(&self) -> i32 {
        match self {
            SyncStatus::Complete => 0,
            SyncStatus::ViewerError { .. } => 1,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SyncStatus::Complete)
    }
}

/// Collapse a rendezvous result to its integer status
pub fn sync_code(result: &Result<SyncStatus, SyncError>) -> i32 {
    match result {
        Ok(status) => status.code(),
        Err(e) => e.code(),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
