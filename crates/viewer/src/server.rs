// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server: accepts clients and spawns one task per connection.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use vx_core::tag::CLIENT_INFORMATION;
use vx_core::{fields, StateObject, StateRegistry};

use crate::connection::handle_connection;
use crate::env;
use crate::error::ViewerError;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub socket_path: PathBuf,
    /// Wait before echoing each sync tag
    pub echo_delay: Duration,
    pub hello_timeout: Duration,
}

impl ViewerConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self { socket_path: socket_path.into(), echo_delay: Duration::ZERO, hello_timeout: env::hello_timeout() }
    }

    pub fn from_env() -> Self {
        Self { echo_delay: env::echo_delay(), ..Self::new(env::socket_path()) }
    }

    vx_core::setters! {
        set {
            echo_delay: Duration,
            hello_timeout: Duration,
        }
    }
}

/// State shared by every connection task
pub(crate) struct ViewerCtx {
    pub(crate) config: ViewerConfig,
    pub(crate) registry: Mutex<StateRegistry>,
    pub(crate) stats: Mutex<Stats>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub connections: u64,
    pub updates: u64,
    pub syncs_echoed: u64,
    /// Connections that ended with an orderly detach
    pub detaches: u64,
}

/// Read-only view of a running viewer, for tests and embedding
#[derive(Clone)]
pub struct ViewerHandle {
    ctx: Arc<ViewerCtx>,
}

impl ViewerHandle {
    pub fn object(&self, tag: &str) -> Option<StateObject> {
        self.ctx.registry.lock().get(tag).cloned()
    }

    pub fn stats(&self) -> Stats {
        *self.ctx.stats.lock()
    }

    /// Name and methods from the last `ClientInformation` received
    pub fn client_information(&self) -> Option<(String, Vec<String>)> {
        let registry = self.ctx.registry.lock();
        let info = registry.get(CLIENT_INFORMATION)?;
        let name = info.str(fields::CLIENT_NAME).ok()?.to_string();
        if name.is_empty() {
            return None;
        }
        let methods = info
            .list(fields::METHODS)
            .ok()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        Some((name, methods))
    }
}

pub struct Viewer {
    listener: UnixListener,
    ctx: Arc<ViewerCtx>,
}

impl Viewer {
    /// Bind the socket, replacing a stale one. Must run inside a tokio runtime.
    pub fn bind(config: ViewerConfig) -> Result<Self, ViewerError> {
        let path = config.socket_path.clone();
        let bind_error = |source| ViewerError::Bind { path: path.clone(), source };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(bind_error)?;
        }
        if path.exists() {
            debug!(path = %path.display(), "removing stale socket");
            std::fs::remove_file(&path).map_err(bind_error)?;
        }
        let listener = UnixListener::bind(&path).map_err(bind_error)?;
        info!(path = %path.display(), "viewer listening");

        let ctx = ViewerCtx {
            config,
            registry: Mutex::new(StateRegistry::with_builtins()),
            stats: Mutex::new(Stats::default()),
        };
        Ok(Self { listener, ctx: Arc::new(ctx) })
    }

    pub fn handle(&self) -> ViewerHandle {
        ViewerHandle { ctx: Arc::clone(&self.ctx) }
    }

    pub fn socket_path(&self) -> &Path {
        &self.ctx.config.socket_path
    }

    /// Accept connections until `cancel` fires, then remove the socket.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.listener.accept() => match result {
                    Ok((stream, _)) => {
                        self.ctx.stats.lock().connections += 1;
                        let ctx = Arc::clone(&self.ctx);
                        let cancel = cancel.child_token();
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, &ctx, cancel).await {
                                error!(error = %e, "connection error");
                            }
                        });
                    }
                    Err(e) => error!(error = %e, "accept error"),
                },
            }
        }

        if let Err(e) = std::fs::remove_file(&self.ctx.config.socket_path) {
            debug!(error = %e, "socket already removed");
        }
        info!("viewer stopped");
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
