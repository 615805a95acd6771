//! Record Log
//!
//! Append, random read and shutdown over one file of fixed-size records.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::checksum::crc32c;
use crate::config::{FsyncPolicy, LogConfig};
use crate::error::{LogError, Result};
use crate::fileio;

use super::flusher::Flusher;
use super::record::{encode_record, record_position, split_record, HEADER_SIZE};

/// Append-only log of fixed-size, checksummed records
///
/// ## Concurrency:
/// - `append`, `sync` and `close` take the state lock exclusively
/// - `read` takes it shared, so readers run in parallel with each other
///   but never alongside a writer
/// - Every operation is a single lock acquisition
pub struct RecordLog {
    path: PathBuf,

    /// Payload bytes per record
    record_size: usize,

    /// Header + payload
    full_record_size: usize,

    fsync_policy: FsyncPolicy,

    /// Mutable state: file handle, next offset, pending counter
    state: Arc<RwLock<LogState>>,

    /// Background syncer, only for `FsyncPolicy::Interval`
    flusher: Mutex<Option<Flusher>>,
}

/// Everything the lock guards. `file == None` means closed.
pub(crate) struct LogState {
    file: Option<File>,
    next_offset: u64,
    pending_since_sync: u64,
}

impl LogState {
    fn file(&self) -> Result<&File> {
        self.file.as_ref().ok_or(LogError::Closed)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    pub(crate) fn pending_since_sync(&self) -> u64 {
        self.pending_since_sync
    }

    /// fsync the file and reset the pending counter.
    fn sync(&mut self) -> Result<()> {
        self.file()?
            .sync_all()
            .map_err(|e| LogError::io("syncing log file", e))?;
        self.pending_since_sync = 0;
        Ok(())
    }

    /// fsync only if something was written since the last sync.
    pub(crate) fn sync_pending(&mut self) -> Result<()> {
        if self.pending_since_sync == 0 {
            return Ok(());
        }
        self.sync()
    }
}

impl RecordLog {
    /// Open or create the log described by `config`
    ///
    /// On open:
    /// 1. Validate the config (no I/O on failure)
    /// 2. Open/create the file and lock it
    /// 3. Truncate any torn tail to the last complete record
    /// 4. Resume the next offset from the remaining record count
    pub fn open(config: LogConfig) -> Result<Self> {
        config.validate()?;

        // validate() keeps this from overflowing
        let full_record_size = HEADER_SIZE + config.record_size;
        let file = fileio::open_owned(&config.path)?;

        // The handle is dropped (and closed) on every error return below.
        let (kept, discarded) = fileio::truncate_to_multiple(&file, full_record_size as u64)?;
        if discarded > 0 {
            warn!(
                path = %config.path.display(),
                discarded_bytes = discarded,
                kept_bytes = kept,
                "truncated torn tail of record log"
            );
        }

        let next_offset = kept / full_record_size as u64;

        if config.preallocate {
            debug!(path = %config.path.display(), "preallocate is reserved; ignoring");
        }

        let state = Arc::new(RwLock::new(LogState {
            file: Some(file),
            next_offset,
            pending_since_sync: 0,
        }));

        let flusher = match config.fsync {
            FsyncPolicy::Interval { period } => Some(Flusher::spawn(
                Arc::clone(&state),
                period,
                config.path.clone(),
            )?),
            _ => None,
        };

        debug!(
            path = %config.path.display(),
            record_size = config.record_size,
            next_offset,
            fsync = ?config.fsync,
            "opened record log"
        );

        Ok(Self {
            path: config.path,
            record_size: config.record_size,
            full_record_size,
            fsync_policy: config.fsync,
            state,
            flusher: Mutex::new(flusher),
        })
    }

    /// Append one payload and return its offset
    ///
    /// The payload must be exactly `record_size` bytes. Offsets are handed
    /// out as 0, 1, 2, ... and a failed write does not consume one.
    ///
    /// Under `FsyncPolicy::Always` a failed fsync is returned as an error
    /// even though the offset has already been assigned.
    pub fn append(&self, payload: &[u8]) -> Result<u64> {
        if payload.len() != self.record_size {
            return Err(LogError::BadPayloadSize {
                expected: self.record_size,
                actual: payload.len(),
            });
        }

        let mut state = self.state.write();
        if state.is_closed() {
            return Err(LogError::Closed);
        }

        let offset = state.next_offset;
        let pos = record_position(offset, self.full_record_size);
        let record = encode_record(payload);

        fileio::write_all_at(state.file()?, &record, pos)
            .map_err(|e| LogError::io("appending record", e))?;

        state.next_offset += 1;
        state.pending_since_sync += 1;

        match self.fsync_policy {
            FsyncPolicy::Always => state.sync()?,
            FsyncPolicy::EveryN { count } => {
                if state.pending_since_sync >= count as u64 {
                    state.sync()?;
                }
            }
            // Handled by the flusher thread
            FsyncPolicy::Interval { .. } => {}
        }

        trace!(offset, pos, "appended record");
        Ok(offset)
    }

    /// Read the payload stored at `offset`
    ///
    /// The checksum is verified on every read. The returned buffer is a
    /// fresh copy owned by the caller.
    pub fn read(&self, offset: u64) -> Result<Vec<u8>> {
        let state = self.state.read();
        let file = state.file()?;

        if offset >= state.next_offset {
            return Err(LogError::OffsetOutOfRange {
                offset,
                next_offset: state.next_offset,
            });
        }

        let pos = record_position(offset, self.full_record_size);
        let mut raw = vec![0u8; self.full_record_size];
        fileio::read_exact_at(file, &mut raw, pos)
            .map_err(|e| LogError::io("reading record", e))?;

        let (stored, payload) = split_record(&raw);
        let computed = crc32c(payload);
        if stored != computed {
            warn!(
                path = %self.path.display(),
                offset,
                stored,
                computed,
                "checksum mismatch"
            );
            return Err(LogError::CorruptRecord {
                offset,
                stored,
                computed,
            });
        }

        Ok(payload.to_vec())
    }

    /// Force all appended records to stable storage
    pub fn sync(&self) -> Result<()> {
        self.state.write().sync()
    }

    /// Close the log
    ///
    /// Idempotent. The log is marked closed and the file handle released
    /// even if the final fsync fails; that failure is still returned.
    pub fn close(&self) -> Result<()> {
        // The flusher takes the state lock, so stop it before we do.
        if let Some(mut flusher) = self.flusher.lock().take() {
            flusher.stop();
        }

        let mut state = self.state.write();
        let Some(file) = state.file.take() else {
            return Ok(());
        };

        let synced = file.sync_all();
        state.pending_since_sync = 0;
        drop(file);

        debug!(
            path = %self.path.display(),
            next_offset = state.next_offset,
            "closed record log"
        );

        synced.map_err(|e| LogError::io("syncing log on close", e))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Offset the next successful append will receive (= record count)
    pub fn next_offset(&self) -> u64 {
        self.state.read().next_offset
    }

    /// True when no record has been written
    pub fn is_empty(&self) -> bool {
        self.next_offset() == 0
    }

    /// Appends written since the last fsync
    pub fn pending_writes(&self) -> u64 {
        self.state.read().pending_since_sync
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().is_closed()
    }

    /// Payload size in bytes
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Header + payload size in bytes
    pub fn full_record_size(&self) -> usize {
        self.full_record_size
    }

    /// Absolute byte position of the record at `offset`
    pub fn position_of(&self, offset: u64) -> u64 {
        record_position(offset, self.full_record_size)
    }

    pub fn fsync_policy(&self) -> FsyncPolicy {
        self.fsync_policy
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RecordLog {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "error closing record log on drop");
        }
    }
}
