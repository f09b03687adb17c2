// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport seam between the session and a viewer.
//!
//! A connection splits into a reader, owned by the listener thread, and a
//! writer, owned by the session state behind its mutex. Closing the writer
//! must unblock a reader parked in [`FrameReader::needs_read`].

use vx_wire::Frame;

use crate::error::ConnectionError;

/// Receiving half, used only by the listener thread
pub trait FrameReader: Send {
    /// Whether a complete frame is ready to read.
    ///
    /// When `blocking`, waits until all of one has arrived; `Ok(false)` then means the
    /// peer closed the connection. When not blocking, `Ok(false)` means
    /// nothing is buffered yet.
    fn needs_read(&mut self, blocking: bool) -> Result<bool, ConnectionError>;

    /// Read one frame. Only called after `needs_read` returned true, and
    /// then never waits on the peer.
    fn read_frame(&mut self) -> Result<Frame, ConnectionError>;
}

/// Sending half
pub trait FrameWriter: Send {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), ConnectionError>;

    /// Shut the transport down in both directions. Idempotent.
    fn close(&mut self);
}

pub type SplitConnection = (Box<dyn FrameReader>, Box<dyn FrameWriter>);

/// A bidirectional frame transport
pub trait Connection: Send {
    fn split(self: Box<Self>) -> Result<SplitConnection, ConnectionError>;
}
