// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Viewer fixture shared by every spec.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use vx_core::{fields, ClientMethod, Severity, Value};
pub use vx_session::{
    sync_code, Endpoint, MemorySink, Session, SessionConfig, SyncBackendKind, SyncError, SyncStatus,
};
pub use vx_viewer::{Viewer, ViewerConfig, ViewerHandle};

pub const WAIT: Duration = Duration::from_secs(5);

/// A viewer serving a socket in a temporary directory on its own runtime.
pub struct ViewerFixture {
    socket: PathBuf,
    handle: ViewerHandle,
    cancel: CancellationToken,
    server: Option<JoinHandle<()>>,
    runtime: Runtime,
    _dir: TempDir,
}

impl ViewerFixture {
    pub fn start() -> Self {
        Self::start_with(|config| config)
    }

    pub fn start_with(configure: impl FnOnce(ViewerConfig) -> ViewerConfig) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread().worker_threads(2).enable_all().build().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = configure(ViewerConfig::new(dir.path().join("viewer.sock")));
        let viewer = {
            let _runtime = runtime.enter();
            Viewer::bind(config).unwrap()
        };
        let socket = viewer.socket_path().to_path_buf();
        let handle = viewer.handle();
        let cancel = CancellationToken::new();
        let server = runtime.spawn(viewer.run(cancel.clone()));
        Self { socket, handle, cancel, server: Some(server), runtime, _dir: dir }
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    pub fn viewer(&self) -> &ViewerHandle {
        &self.handle
    }

    pub fn connect(&self) -> Session {
        self.connect_with(SessionConfig::default())
    }

    pub fn connect_with(&self, config: SessionConfig) -> Session {
        Session::connect_endpoint(config, &Endpoint::Unix(self.socket.clone())).unwrap()
    }

    /// Connect with messages captured instead of printed.
    pub fn connect_capturing(&self, config: SessionConfig) -> (Session, MemorySink) {
        let sink = MemorySink::new();
        let connection = vx_session::SocketConnection::connect(&Endpoint::Unix(self.socket.clone())).unwrap();
        let session = Session::connect_with_sink(config, connection, sink.clone()).unwrap();
        (session, sink)
    }
}

impl Drop for ViewerFixture {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(server) = self.server.take() {
            let _ = self.runtime.block_on(server);
        }
    }
}

/// Poll `check` until it holds or [`WAIT`] elapses.
pub fn wait_for(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    check()
}
