// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded pool running client-method handlers off the listener thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use tracing::{debug, error, warn};

use crate::error::SessionError;

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Submission side, cloned into the listener thread
#[derive(Clone)]
pub(crate) struct JobQueue {
    jobs: Sender<Job>,
}

impl JobQueue {
    /// Queue a job without blocking. Returns false if it was dropped.
    pub(crate) fn submit(&self, name: &str, job: Job) -> bool {
        match self.jobs.try_send(job) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(method = name, "client method queue full, dropping");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!(method = name, "method workers stopped, dropping");
                false
            }
        }
    }
}

pub(crate) struct WorkerPool {
    queue: JobQueue,
    stop: Option<Sender<()>>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub(crate) fn start(workers: usize, capacity: usize) -> Result<Self, SessionError> {
        let (jobs_tx, jobs_rx) = bounded::<Job>(capacity.max(1));
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let mut threads = Vec::with_capacity(workers.max(1));
        for index in 0..workers.max(1) {
            let jobs = jobs_rx.clone();
            let stop = stop_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("vx-method-{}", index))
                .spawn(move || work(jobs, stop))
                .map_err(|source| SessionError::Spawn { what: "method worker", source })?;
            threads.push(handle);
        }

        Ok(Self { queue: JobQueue { jobs: jobs_tx }, stop: Some(stop_tx), threads })
    }

    pub(crate) fn queue(&self) -> JobQueue {
        self.queue.clone()
    }

    /// Stop the workers and join them. Jobs still queued are discarded;
    /// a job already running is allowed to finish.
    pub(crate) fn shutdown(&mut self) {
        // dropping the stop sender disconnects every worker's stop arm
        if self.stop.take().is_none() {
            return;
        }
        let current = thread::current().id();
        for handle in self.threads.drain(..) {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!("method worker exited abnormally");
            }
        }
    }
}

fn work(jobs: Receiver<Job>, stop: Receiver<()>) {
    loop {
        select! {
            recv(stop) -> _ => break,
            recv(jobs) -> job => match job {
                Ok(job) => {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("client method handler panicked");
                    }
                }
                Err(_) => break,
            },
        }
    }
    debug!("method worker exiting");
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
