// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket transport to a running viewer.

use std::fmt;
use std::io::{self, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream};
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use vx_wire::{decode, write_frame, Frame, ProtocolError, MAX_FRAME_LEN};

use crate::connection::{Connection, FrameReader, FrameWriter, SplitConnection};
use crate::error::ConnectionError;

/// How long a non-blocking `needs_read` waits for bytes
const POLL_TIMEOUT: Duration = Duration::from_millis(1);

const READ_CHUNK: usize = 8 * 1024;

/// Where a viewer listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    #[cfg(unix)]
    Unix(PathBuf),
    /// `host:port`
    Tcp(String),
}

impl Endpoint {
    /// `tcp://host:port` selects TCP; anything else is a socket path.
    #[cfg(unix)]
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix("tcp://") {
            Some(addr) => Endpoint::Tcp(addr.to_string()),
            None => Endpoint::Unix(PathBuf::from(raw)),
        }
    }

    #[cfg(not(unix))]
    pub fn parse(raw: &str) -> Self {
        Endpoint::Tcp(raw.strip_prefix("tcp://").unwrap_or(raw).to_string())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(unix)]
            Endpoint::Unix(path) => write!(f, "{}", path.display()),
            Endpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

enum Stream {
    #[cfg(unix)]
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl Stream {
    fn try_clone(&self) -> io::Result<Stream> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.try_clone().map(Stream::Unix),
            Stream::Tcp(s) => s.try_clone().map(Stream::Tcp),
        }
    }

    /// Applies to reads only, so the writer's descriptor is unaffected.
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.set_read_timeout(timeout),
            Stream::Tcp(s) => s.set_read_timeout(timeout),
        }
    }

    fn shutdown(&self) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.shutdown(Shutdown::Both),
            Stream::Tcp(s) => s.shutdown(Shutdown::Both),
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.read(buf),
            Stream::Tcp(s) => s.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.write(buf),
            Stream::Tcp(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.flush(),
            Stream::Tcp(s) => s.flush(),
        }
    }
}

/// A connected Unix or TCP socket
pub struct SocketConnection {
    stream: Stream,
}

impl SocketConnection {
    pub fn connect(endpoint: &Endpoint) -> Result<Self, ConnectionError> {
        let connect_error = |source| ConnectionError::Connect { endpoint: endpoint.to_string(), source };
        let stream = match endpoint {
            #[cfg(unix)]
            Endpoint::Unix(path) => Stream::Unix(UnixStream::connect(path).map_err(connect_error)?),
            Endpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str()).map_err(connect_error)?;
                // frames are small and latency-bound
                stream.set_nodelay(true).map_err(connect_error)?;
                Stream::Tcp(stream)
            }
        };
        debug!(%endpoint, "connected to viewer");
        Ok(Self { stream })
    }

    #[cfg(unix)]
    pub fn from_unix(stream: UnixStream) -> Self {
        Self { stream: Stream::Unix(stream) }
    }

    pub fn from_tcp(stream: TcpStream) -> Self {
        Self { stream: Stream::Tcp(stream) }
    }
}

impl Connection for SocketConnection {
    fn split(self: Box<Self>) -> Result<SplitConnection, ConnectionError> {
        let read_half = self.stream.try_clone().map_err(vx_wire::ProtocolError::from)?;
        let reader = SocketReader { stream: read_half, buf: Vec::new() };
        let writer = SocketWriter { inner: BufWriter::new(self.stream), closed: false };
        Ok((Box::new(reader), Box::new(writer)))
    }
}

/// Buffers bytes until a whole frame is present, so `read_frame` never
/// waits on the peer.
struct SocketReader {
    stream: Stream,
    buf: Vec<u8>,
}

impl SocketReader {
    /// Length of the first buffered frame, prefix included, once all of it
    /// has arrived.
    fn complete_frame(&self) -> Result<Option<usize>, ProtocolError> {
        let Some(prefix) = self.buf.get(..4) else {
            return Ok(None);
        };
        let len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        if len > MAX_FRAME_LEN {
            return Err(ProtocolError::FrameTooLarge(len));
        }
        Ok((self.buf.len() >= 4 + len).then_some(4 + len))
    }

    /// One read from the socket into the buffer. Zero means end of stream.
    fn fill(&mut self) -> io::Result<usize> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Block until a whole frame is buffered. `None` on a clean hangup
    /// between frames.
    fn fill_frame(&mut self) -> Result<Option<usize>, ProtocolError> {
        loop {
            if let Some(end) = self.complete_frame()? {
                return Ok(Some(end));
            }
            if self.fill()? == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed mid-frame").into());
            }
        }
    }

    fn poll(&mut self) -> Result<bool, ProtocolError> {
        if self.complete_frame()?.is_some() {
            return Ok(true);
        }
        self.stream.set_read_timeout(Some(POLL_TIMEOUT))?;
        let filled = self.fill();
        self.stream.set_read_timeout(None)?;
        match filled {
            Ok(0) if !self.buf.is_empty() => {
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed mid-frame").into())
            }
            Ok(_) => Ok(self.complete_frame()?.is_some()),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(self.complete_frame()?.is_some())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl FrameReader for SocketReader {
    fn needs_read(&mut self, blocking: bool) -> Result<bool, ConnectionError> {
        if blocking {
            Ok(self.fill_frame()?.is_some())
        } else {
            Ok(self.poll()?)
        }
    }

    fn read_frame(&mut self) -> Result<Frame, ConnectionError> {
        let end = self.fill_frame()?.ok_or(ProtocolError::ConnectionClosed)?;
        let payload: Vec<u8> = self.buf.drain(..end).skip(4).collect();
        Ok(decode(&payload)?)
    }
}

struct SocketWriter {
    inner: BufWriter<Stream>,
    closed: bool,
}

impl FrameWriter for SocketWriter {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), ConnectionError> {
        if self.closed {
            return Err(ConnectionError::Lost);
        }
        Ok(write_frame(&mut self.inner, frame)?)
    }

    fn close(&mut self) {
        if std::mem::replace(&mut self.closed, true) {
            return;
        }
        let _ = self.inner.flush();
        if let Err(e) = self.inner.get_ref().shutdown() {
            // already disconnected by the peer
            debug!(error = %e, "socket shutdown failed");
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
