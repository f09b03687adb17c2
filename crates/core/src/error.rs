// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::tag::ObjectTag;
use crate::value::ValueKind;

/// Errors from state object access and update application
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("unknown state object: {0}")]
    UnknownObject(ObjectTag),

    #[error("{tag}.{field}: expected {expected}, got {actual}")]
    TypeMismatch { tag: ObjectTag, field: String, expected: ValueKind, actual: ValueKind },

    #[error("{tag}.{field}: missing field")]
    MissingField { tag: ObjectTag, field: String },

    #[error("{tag}: {message}")]
    Malformed { tag: ObjectTag, message: String },
}
