// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory viewer for tests.
//!
//! [`FakeViewer::pair`] returns a connection for the session and the
//! viewer end, already holding the handshake reply. Tests drive the viewer
//! end by hand, or hand it to [`AutoViewer`] to echo every rendezvous.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use vx_core::tag::SYNC_ATTRIBUTES;
use vx_core::{fields, ClientMethod, Severity, StateUpdate, StatusRecord, Value};
use vx_wire::Frame;

use crate::connection::{Connection, FrameReader, FrameWriter, SplitConnection};
use crate::error::ConnectionError;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Session end of an in-memory connection
pub struct MemoryConnection {
    incoming: Receiver<Frame>,
    outgoing: Sender<Frame>,
}

impl Connection for MemoryConnection {
    fn split(self: Box<Self>) -> Result<SplitConnection, ConnectionError> {
        let (close_tx, close_rx) = bounded(0);
        let reader = MemoryReader { incoming: self.incoming, closed: close_rx, peeked: None };
        let writer = MemoryWriter { outgoing: Some(self.outgoing), close: Some(close_tx) };
        Ok((Box::new(reader), Box::new(writer)))
    }
}

struct MemoryReader {
    incoming: Receiver<Frame>,
    closed: Receiver<()>,
    peeked: Option<Frame>,
}

impl FrameReader for MemoryReader {
    fn needs_read(&mut self, blocking: bool) -> Result<bool, ConnectionError> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        let next = if blocking {
            select! {
                recv(self.incoming) -> frame => frame.ok(),
                recv(self.closed) -> _ => None,
            }
        } else {
            match self.incoming.try_recv() {
                Ok(frame) => Some(frame),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
            }
        };
        self.peeked = next;
        Ok(self.peeked.is_some())
    }

    fn read_frame(&mut self) -> Result<Frame, ConnectionError> {
        match self.peeked.take() {
            Some(frame) => Ok(frame),
            None => self.incoming.recv().map_err(|_| ConnectionError::Lost),
        }
    }
}

struct MemoryWriter {
    outgoing: Option<Sender<Frame>>,
    close: Option<Sender<()>>,
}

impl FrameWriter for MemoryWriter {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), ConnectionError> {
        let outgoing = self.outgoing.as_ref().ok_or(ConnectionError::Lost)?;
        outgoing.send(frame.clone()).map_err(|_| ConnectionError::Lost)
    }

    fn close(&mut self) {
        self.outgoing = None;
        self.close = None;
    }
}

/// Viewer end of an in-memory connection, driven by the test
pub struct FakeViewer {
    to_client: Option<Sender<Frame>>,
    from_client: Receiver<Frame>,
}

impl FakeViewer {
    pub fn pair() -> (MemoryConnection, FakeViewer) {
        let (to_client, incoming) = unbounded();
        let (outgoing, from_client) = unbounded();
        // handshake reply, so `Session::connect` does not wait on the test
        let _ = to_client.send(Frame::hello());
        (MemoryConnection { incoming, outgoing }, FakeViewer { to_client: Some(to_client), from_client })
    }

    pub fn send_frame(&self, frame: Frame) -> bool {
        self.to_client.as_ref().is_some_and(|tx| tx.send(frame).is_ok())
    }

    pub fn send(&self, update: StateUpdate) -> bool {
        self.send_frame(Frame::update(update))
    }

    pub fn echo_sync(&self, tag: i64) -> bool {
        self.send(StateUpdate::new(SYNC_ATTRIBUTES).with(fields::SYNC_TAG, tag))
    }

    pub fn push_status(&self, severity: Severity, text: &str) -> bool {
        self.send(StatusRecord::new(severity, text).to_update())
    }

    pub fn push_method(&self, name: &str, args: Vec<Value>) -> bool {
        self.send(ClientMethod::from_call(name, args).to_update())
    }

    /// Next frame from the session, waiting up to five seconds
    pub fn recv(&self) -> Option<Frame> {
        self.recv_timeout(RECV_TIMEOUT)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Frame> {
        match self.from_client.recv_timeout(timeout) {
            Ok(frame) => Some(frame),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Skip frames until an update for `tag` arrives
    pub fn expect_update(&self, tag: &str) -> Option<StateUpdate> {
        loop {
            match self.recv()? {
                Frame::Update { update } if update.tag == tag => return Some(update),
                _ => continue,
            }
        }
    }

    /// Tag of the next rendezvous the session starts
    pub fn next_sync_tag(&self) -> Option<i64> {
        self.expect_update(SYNC_ATTRIBUTES)?.get(fields::SYNC_TAG)?.as_int()
    }

    /// Close the viewer's sending side; the session reads end of stream.
    pub fn disconnect(&mut self) {
        self.to_client = None;
    }

    /// Whether the session closed its sending side
    pub fn session_closed(&self) -> bool {
        matches!(self.from_client.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Answer rendezvous automatically on a background thread
    pub fn into_auto(self) -> AutoViewer {
        AutoViewer::start(self)
    }
}

/// A fake viewer that echoes every sync tag and records what it receives
pub struct AutoViewer {
    to_client: Arc<Mutex<Option<Sender<Frame>>>>,
    received: Arc<Mutex<Vec<Frame>>>,
    thread: Option<JoinHandle<()>>,
}

impl AutoViewer {
    fn start(viewer: FakeViewer) -> Self {
        let FakeViewer { to_client, from_client } = viewer;
        let to_client = Arc::new(Mutex::new(to_client));
        let received = Arc::new(Mutex::new(Vec::new()));
        let echo = Arc::clone(&to_client);
        let log = Arc::clone(&received);
        let thread = thread::spawn(move || {
            for frame in from_client.iter() {
                if let Frame::Update { update } = &frame {
                    if update.tag == SYNC_ATTRIBUTES {
                        if let Some(tx) = echo.lock().as_ref() {
                            let _ = tx.send(frame.clone());
                        }
                    }
                }
                let detach = matches!(frame, Frame::Detach);
                log.lock().push(frame);
                if detach {
                    break;
                }
            }
        });
        Self { to_client, received, thread: Some(thread) }
    }

    pub fn send(&self, update: StateUpdate) -> bool {
        self.to_client.lock().as_ref().is_some_and(|tx| tx.send(Frame::update(update)).is_ok())
    }

    pub fn push_status(&self, severity: Severity, text: &str) -> bool {
        self.send(StatusRecord::new(severity, text).to_update())
    }

    pub fn push_method(&self, name: &str, args: Vec<Value>) -> bool {
        self.send(ClientMethod::from_call(name, args).to_update())
    }

    pub fn received(&self) -> Vec<Frame> {
        self.received.lock().clone()
    }

    /// Updates received for `tag`, in order
    pub fn updates(&self, tag: &str) -> Vec<StateUpdate> {
        self.received
            .lock()
            .iter()
            .filter_map(|frame| match frame {
                Frame::Update { update } if update.tag == tag => Some(update.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn saw_detach(&self) -> bool {
        self.received.lock().iter().any(|f| matches!(f, Frame::Detach))
    }

    /// Close the viewer's sending side; the session reads end of stream.
    pub fn disconnect(&self) {
        self.to_client.lock().take();
    }

    /// Wait for the session to detach or close its side
    pub fn join(mut self) -> Vec<Frame> {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        self.received()
    }
}
