// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod listen;
pub mod rpc;
pub mod set;
pub mod sync;

use anyhow::{Context, Result};
use tracing::debug;
use vx_session::{Endpoint, Session, SessionConfig, SessionHandle};

use crate::exit_error::ExitError;
use crate::output::{OutputFormat, SyncReport};

/// Connect to the viewer at `socket`, or the default socket path.
pub fn connect(socket: Option<&str>, config: SessionConfig) -> Result<Session> {
    let endpoint = match socket {
        Some(raw) => Endpoint::parse(raw),
        None => Endpoint::parse(&vx_session::env::socket_path().to_string_lossy()),
    };
    debug!(%endpoint, backend = %config.backend, "connecting to viewer");
    Session::connect_endpoint(config, &endpoint)
        .with_context(|| format!("cannot reach viewer at {}", endpoint))
}

/// Rendezvous with the viewer and print the outcome. Non-zero statuses
/// become an [`ExitError`] carrying the same code.
pub(crate) fn synchronize_and_report(handle: &SessionHandle, format: OutputFormat) -> Result<()> {
    let result = handle.synchronize();
    let report = SyncReport::new(&result, handle.logged_commands());
    println!("{}", report.render(format)?);
    if report.code != 0 {
        return Err(ExitError::new(report.code, String::new()).into());
    }
    Ok(())
}

/// Split `field=value`, parsing the value as a literal.
pub(crate) fn parse_assignment(s: &str) -> Result<(String, vx_core::Value), String> {
    let (field, raw) =
        s.split_once('=').ok_or_else(|| format!("invalid assignment '{}': must be field=value", s))?;
    if field.is_empty() {
        return Err(format!("invalid assignment '{}': field name is empty", s));
    }
    Ok((field.to_string(), vx_core::Value::parse_literal(raw)))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
