// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::Result;
use vx_session::SessionHandle;

use crate::output::OutputFormat;

pub fn handle(session: &SessionHandle, format: OutputFormat) -> Result<()> {
    session.set_ready();
    super::synchronize_and_report(session, format)
}
