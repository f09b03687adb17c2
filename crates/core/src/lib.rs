// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vx-core: State objects shared between a control process and a viewer

pub mod macros;

pub mod error;
pub mod method;
pub mod registry;
pub mod state;
pub mod status;
pub mod tag;
pub mod value;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::StateError;
pub use method::ClientMethod;
pub use registry::{builtin_objects, StateRegistry};
pub use state::{StateObject, StateUpdate};
pub use status::{Severity, StatusRecord};
pub use tag::{fields, ObjectTag};
pub use value::{Value, ValueKind};
