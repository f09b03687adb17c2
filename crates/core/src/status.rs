// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status and error messages pushed by the viewer.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::state::{StateObject, StateUpdate};
use crate::tag::{fields, ObjectTag, MESSAGE_ATTRIBUTES};

/// Message severity.
///
/// Ordered from most to least important; `ErrorClear` is a control message
/// rather than something to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Message,
    ErrorClear,
    Information,
}

crate::simple_display! {
    Severity {
        Error => "error",
        Warning => "warning",
        Message => "message",
        ErrorClear => "error_clear",
        Information => "information",
    }
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "message" => Some(Severity::Message),
            "error_clear" => Some(Severity::ErrorClear),
            "information" => Some(Severity::Information),
            _ => None,
        }
    }

    /// Display rank: lower is more important. `ErrorClear` has no rank.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Severity::Error => Some(0),
            Severity::Warning => Some(1),
            Severity::Message => Some(2),
            Severity::Information => Some(3),
            Severity::ErrorClear => None,
        }
    }
}

/// One status message as carried by `MessageAttributes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub text: String,
    pub severity: Severity,
}

impl StatusRecord {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self { text: text.into(), severity }
    }

    pub fn from_object(object: &StateObject) -> Result<Self, StateError> {
        let text = object.str(fields::TEXT)?.to_string();
        let raw = object.str(fields::SEVERITY)?;
        let severity = Severity::parse(raw).ok_or_else(|| StateError::Malformed {
            tag: ObjectTag::message(),
            message: format!("unknown severity '{}'", raw),
        })?;
        Ok(Self { text, severity })
    }

    pub fn to_update(&self) -> StateUpdate {
        StateUpdate::new(MESSAGE_ATTRIBUTES)
            .with(fields::TEXT, self.text.as_str())
            .with(fields::SEVERITY, self.severity.to_string())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
