// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs: a real session talking to a real viewer over a Unix
//! socket.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/lifecycle.rs"]
mod lifecycle;
#[path = "specs/messages.rs"]
mod messages;
#[path = "specs/methods.rs"]
mod methods;
#[path = "specs/rendezvous.rs"]
mod rendezvous;
