// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vx listen`: print client methods as the viewer invokes them

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use vx_core::ClientMethod;
use vx_session::SessionHandle;

use crate::exit_error::ExitError;
use crate::output::OutputFormat;

const POLL: Duration = Duration::from_millis(50);

#[derive(Args)]
pub struct ListenArgs {
    /// Method names to accept (repeatable)
    #[arg(long = "method", value_name = "NAME")]
    pub methods: Vec<String>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Invocation<'a> {
    method: &'a str,
    args: Vec<String>,
}

pub fn handle(session: &SessionHandle, args: ListenArgs, format: OutputFormat) -> Result<()> {
    for name in &args.methods {
        session.register_client_method(name, move |_, method| {
            if let Some(line) = format_invocation(method, format) {
                println!("{}", line);
            }
        })?;
    }
    session.set_ready();

    let deadline = args.timeout.map(|secs| Instant::now() + Duration::from_secs(secs));
    while !session.quit_requested() && session.is_viewer_alive() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ExitError::new(2, "timed out waiting for the viewer to quit").into());
        }
        thread::sleep(POLL);
    }
    if session.quit_requested() {
        Ok(())
    } else {
        Err(ExitError::new(-1, vx_session::error::VIEWER_TERMINATED).into())
    }
}

pub(crate) fn format_invocation(method: &ClientMethod, format: OutputFormat) -> Option<String> {
    let args: Vec<String> =
        method.args().iter().map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())).collect();
    match format {
        OutputFormat::Text if args.is_empty() => Some(method.name().to_string()),
        OutputFormat::Text => Some(format!("{} {}", method.name(), args.join(" "))),
        OutputFormat::Json => serde_json::to_string(&Invocation { method: method.name(), args }).ok(),
    }
}

#[cfg(test)]
#[path = "listen_tests.rs"]
mod tests;
