// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;
use vx_session::{SyncError, SyncStatus};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How a rendezvous ended, in printable form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub code: i32,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub commands: u64,
}

impl SyncReport {
    pub fn new(result: &Result<SyncStatus, SyncError>, commands: u64) -> Self {
        let code = vx_session::sync_code(result);
        let (outcome, message) = match result {
            Ok(SyncStatus::Complete) => ("complete", None),
            Ok(SyncStatus::ViewerError { message }) => ("viewer_error", Some(message.clone())),
            Err(SyncError::Interrupted) => ("interrupted", Some(SyncError::Interrupted.to_string())),
            Err(e) if e.code() < 0 => ("terminated", Some(e.to_string())),
            Err(e) => ("failed", Some(e.to_string())),
        };
        Self { code, outcome, message, commands }
    }

    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
            OutputFormat::Text => Ok(match &self.message {
                Some(message) => format!("{}: {}", self.outcome, message),
                None => format!("{} ({} commands)", self.outcome, self.commands),
            }),
        }
    }
}
