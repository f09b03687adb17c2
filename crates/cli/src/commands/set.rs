// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vx set`: edit one state object

use anyhow::{Context, Result};
use clap::Args;
use vx_core::{StateObject, Value};
use vx_session::SessionHandle;

use crate::output::OutputFormat;

#[derive(Args)]
pub struct SetArgs {
    /// Object tag, e.g. `ImageAttributes`
    pub object: String,

    /// Assignments; values parse as int, double, bool, [list] or text
    #[arg(value_name = "FIELD=VALUE", required = true, value_parser = super::parse_assignment)]
    pub fields: Vec<(String, Value)>,
}

pub fn handle(session: &SessionHandle, args: SetArgs, format: OutputFormat) -> Result<()> {
    session.set_ready();
    apply(session, &args.object, args.fields)?;
    super::synchronize_and_report(session, format)
}

/// Set `fields` on `tag`, declaring it first if this client has not seen it.
pub(crate) fn apply(session: &SessionHandle, tag: &str, fields: Vec<(String, Value)>) -> Result<()> {
    let mut guard = session.lock();
    if guard.object(tag).is_none() {
        guard.declare(StateObject::new(tag));
    }
    for (field, value) in fields {
        guard.set(tag, &field, value).with_context(|| format!("cannot set {}.{}", tag, field))?;
    }
    guard.notify(tag)?;
    Ok(())
}

#[cfg(test)]
#[path = "set_tests.rs"]
mod tests;
