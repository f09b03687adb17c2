// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between the control process and the viewer.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
mod frame;
mod wire;

pub use frame::Frame;
pub use wire::{decode, encode, read_frame, write_frame, ProtocolError, MAX_FRAME_LEN};
pub use wire::{read_frame_async, read_frame_timeout, write_frame_async};

/// Protocol version exchanged in the `Hello` handshake
pub const PROTOCOL_VERSION: &str = concat!("vx/", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod property_tests;
