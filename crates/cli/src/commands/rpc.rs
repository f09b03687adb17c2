// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vx rpc`: ask the viewer to run a named procedure

use anyhow::Result;
use clap::Args;
use vx_core::Value;
use vx_session::SessionHandle;

use crate::output::OutputFormat;

#[derive(Args)]
pub struct RpcArgs {
    /// RPC name, e.g. `RaiseError`
    pub name: String,

    /// Arguments, parsed as literals
    pub args: Vec<String>,
}

impl RpcArgs {
    pub fn values(&self) -> Vec<Value> {
        self.args.iter().map(|raw| Value::parse_literal(raw)).collect()
    }
}

pub fn handle(session: &SessionHandle, args: RpcArgs, format: OutputFormat) -> Result<()> {
    session.set_ready();
    session.invoke_rpc(&args.name, args.values())?;
    super::synchronize_and_report(session, format)
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
