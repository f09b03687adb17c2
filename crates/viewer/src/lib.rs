// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vx-viewer: a reference viewer process.
//!
//! Keeps its own copy of every state object, echoes rendezvous tags in
//! order, and turns `ViewerRpc` requests into status messages and client
//! methods pushed back to the client.

mod connection;
pub mod env;
pub mod error;
pub mod rpc;
pub mod server;

pub use error::ViewerError;
pub use rpc::{RpcEffect, RpcError, ViewerRpc};
pub use server::{Stats, Viewer, ViewerConfig, ViewerHandle};
