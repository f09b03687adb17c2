// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object type tags shared by the control process and the viewer.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Stable identifier of a state object type.
///
/// Both processes use the same tag for the same object, which is what makes
/// the wire format symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectTag(String);

impl ObjectTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sync() -> Self {
        Self::new(SYNC_ATTRIBUTES)
    }

    pub fn message() -> Self {
        Self::new(MESSAGE_ATTRIBUTES)
    }

    pub fn client_method() -> Self {
        Self::new(CLIENT_METHOD)
    }

    pub fn client_information() -> Self {
        Self::new(CLIENT_INFORMATION)
    }

    pub fn viewer_rpc() -> Self {
        Self::new(VIEWER_RPC)
    }
}

impl std::fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ObjectTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ObjectTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ObjectTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ObjectTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Well-known objects ──────────────────────────────────────────────────

/// Carries the rendezvous tag in both directions.
pub const SYNC_ATTRIBUTES: &str = "SyncAttributes";
/// Most recent status or error message pushed by the viewer.
pub const MESSAGE_ATTRIBUTES: &str = "MessageAttributes";
/// Viewer-to-client method invocation.
pub const CLIENT_METHOD: &str = "ClientMethod";
/// Client capabilities, sent in answer to a capability query.
pub const CLIENT_INFORMATION: &str = "ClientInformation";
/// Client-to-viewer command invocation.
pub const VIEWER_RPC: &str = "ViewerRpc";

/// Field names of the well-known objects.
pub mod fields {
    pub const SYNC_TAG: &str = "sync_tag";
    pub const TEXT: &str = "text";
    pub const SEVERITY: &str = "severity";
    pub const METHOD_NAME: &str = "method_name";
    pub const ARGS: &str = "args";
    pub const CLIENT_NAME: &str = "client_name";
    pub const METHODS: &str = "methods";
    pub const RPC: &str = "rpc";
}
