// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status messages from the viewer.
//!
//! Errors latch a sticky flag that the next rendezvous consumes; the other
//! severities are only shown, subject to the suppression level.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use vx_core::{Severity, StatusRecord};

/// Highest suppression level: only errors are shown
pub const MAX_SUPPRESSION_LEVEL: u8 = 3;

/// Where visible messages go
pub trait MessageSink: Send {
    fn emit(&mut self, record: &StatusRecord);
}

/// Prints visible messages on stderr, prefixed by severity
#[derive(Debug, Default)]
pub struct StderrSink;

impl MessageSink for StderrSink {
    fn emit(&mut self, record: &StatusRecord) {
        match record.severity {
            Severity::Message | Severity::Information => eprintln!("{}", record.text),
            severity => eprintln!("{}: {}", severity, record.text),
        }
    }
}

/// Collects visible messages, for embedding front ends and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<StatusRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StatusRecord> {
        self.records.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.text.clone()).collect()
    }
}

impl MessageSink for MemorySink {
    fn emit(&mut self, record: &StatusRecord) {
        self.records.lock().push(record.clone());
    }
}

pub(crate) struct MessageObserver {
    level: u8,
    error_pending: bool,
    error_text: Option<String>,
    latest: Option<StatusRecord>,
    sink: Box<dyn MessageSink>,
}

impl MessageObserver {
    pub(crate) fn new(level: u8, sink: Box<dyn MessageSink>) -> Self {
        Self {
            level: level.min(MAX_SUPPRESSION_LEVEL),
            error_pending: false,
            error_text: None,
            latest: None,
            sink,
        }
    }

    pub(crate) fn level(&self) -> u8 {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: u8) {
        self.level = level.min(MAX_SUPPRESSION_LEVEL);
    }

    pub(crate) fn set_sink(&mut self, sink: Box<dyn MessageSink>) {
        self.sink = sink;
    }

    /// Level 0 shows everything; each step hides the next least
    /// important severity.
    pub(crate) fn is_visible(&self, severity: Severity) -> bool {
        match severity.rank() {
            Some(rank) => rank + self.level <= MAX_SUPPRESSION_LEVEL,
            None => false,
        }
    }

    pub(crate) fn observe(&mut self, record: StatusRecord) {
        match record.severity {
            Severity::Error => {
                self.error_pending = true;
                self.error_text = Some(record.text.clone());
            }
            Severity::ErrorClear => {
                debug!("viewer cleared its error");
                self.error_pending = false;
            }
            _ => {}
        }
        if self.is_visible(record.severity) {
            self.sink.emit(&record);
        }
        self.latest = Some(record);
    }

    pub(crate) fn error_pending(&self) -> bool {
        self.error_pending
    }

    /// Text of the most recent error, kept after the flag is cleared
    pub(crate) fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub(crate) fn latest(&self) -> Option<&StatusRecord> {
        self.latest.as_ref()
    }

    /// Consume the sticky error flag
    pub(crate) fn take_error(&mut self) -> Option<String> {
        if !std::mem::take(&mut self.error_pending) {
            return None;
        }
        Some(self.error_text.clone().unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
