// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vxd: reference viewer daemon

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vx_viewer::{Viewer, ViewerConfig};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = ViewerConfig::from_env();
    let viewer = match Viewer::bind(config) {
        Ok(viewer) => viewer,
        Err(e) => {
            error!(error = %e, "failed to start viewer");
            return std::process::ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                on_signal.cancel();
            }
            Err(e) => error!(error = %e, "cannot listen for ctrl-c"),
        }
    });

    viewer.run(cancel).await;
    std::process::ExitCode::SUCCESS
}
