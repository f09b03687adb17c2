// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use vx_core::StateUpdate;

/// One message on the connection, in either direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Frame {
    /// Version handshake, sent first by the control process and answered
    /// by the viewer
    Hello { version: String },

    /// A state object change
    Update { update: StateUpdate },

    /// The control process is leaving; the viewer closes the connection
    Detach,
}

impl Frame {
    pub fn update(update: StateUpdate) -> Self {
        Frame::Update { update }
    }

    pub fn hello() -> Self {
        Frame::Hello { version: crate::PROTOCOL_VERSION.to_string() }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Hello { .. } => "hello",
            Frame::Update { .. } => "update",
            Frame::Detach => "detach",
        }
    }
}
