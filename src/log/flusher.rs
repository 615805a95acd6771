//! Background flusher for `FsyncPolicy::Interval`
//!
//! One thread per log. It wakes on a fixed tick, syncs if any appends are
//! pending, and exits when its shutdown sender is dropped.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Sender};
use parking_lot::RwLock;

use crate::error::{LogError, Result};

use super::record_log::LogState;

pub(crate) struct Flusher {
    /// Dropping this wakes the thread and makes it exit
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Flusher {
    pub(crate) fn spawn(
        state: Arc<RwLock<LogState>>,
        period: Duration,
        path: PathBuf,
    ) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
        let ticker = channel::tick(period);

        let handle = thread::Builder::new()
            .name("fixlog-flusher".to_string())
            .spawn(move || loop {
                let shutdown = crossbeam::select! {
                    recv(ticker) -> _ => false,
                    recv(shutdown_rx) -> _ => true,
                };
                if shutdown {
                    break;
                }

                let mut state = state.write();
                if state.is_closed() {
                    break;
                }
                if let Err(e) = state.sync_pending() {
                    tracing::warn!(
                        path = %path.display(),
                        pending = state.pending_since_sync(),
                        error = %e,
                        "interval fsync failed"
                    );
                }
            })
            .map_err(|e| LogError::io("spawning flusher thread", e))?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    ///
    /// Must not be called while holding the log's state lock.
    pub(crate) fn stop(&mut self) {
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("fsync flusher thread panicked");
            }
        }
    }
}

impl Drop for Flusher {
    fn drop(&mut self) {
        self.stop();
    }
}
