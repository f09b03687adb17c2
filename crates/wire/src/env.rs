// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket location shared by the viewer and its clients.

use std::path::PathBuf;

/// Resolve the viewer socket:
/// VX_SOCKET > VX_STATE_DIR/viewer.sock > runtime dir/vx/viewer.sock > temp dir
pub fn socket_path() -> PathBuf {
    if let Ok(path) = std::env::var("VX_SOCKET") {
        return PathBuf::from(path);
    }
    if let Ok(dir) = std::env::var("VX_STATE_DIR") {
        return PathBuf::from(dir).join("viewer.sock");
    }
    match dirs::runtime_dir() {
        Some(dir) => dir.join("vx").join("viewer.sock"),
        None => std::env::temp_dir().join("vx-viewer.sock"),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn explicit_socket_wins() {
        std::env::set_var("VX_SOCKET", "/tmp/a.sock");
        std::env::set_var("VX_STATE_DIR", "/tmp/state");
        let path = socket_path();
        std::env::remove_var("VX_SOCKET");
        std::env::remove_var("VX_STATE_DIR");
        assert_eq!(path, PathBuf::from("/tmp/a.sock"));
    }

    #[test]
    #[serial]
    fn state_dir_hosts_the_socket() {
        std::env::remove_var("VX_SOCKET");
        std::env::set_var("VX_STATE_DIR", "/tmp/state");
        let path = socket_path();
        std::env::remove_var("VX_STATE_DIR");
        assert_eq!(path, PathBuf::from("/tmp/state/viewer.sock"));
    }

    #[test]
    #[serial]
    fn falls_back_to_a_file_named_for_the_viewer() {
        std::env::remove_var("VX_SOCKET");
        std::env::remove_var("VX_STATE_DIR");
        let path = socket_path();
        assert!(path.to_string_lossy().ends_with("viewer.sock"));
    }
}
