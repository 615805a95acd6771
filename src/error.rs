//! Error types for fixlog
//!
//! One error type covers the record log and the sparse index. I/O failures
//! always carry the operation that failed so callers can tell a broken disk
//! apart from corrupt data.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Unified error type for fixlog operations
#[derive(Debug, Error)]
pub enum LogError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("log: file path is required")]
    FilePathRequired,

    #[error("log: record size must be > 0 and leave room for the header, got {size}")]
    InvalidRecordSize { size: usize },

    #[error("log: invalid fsync policy: {0}")]
    InvalidFsyncPolicy(String),

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("log: payload size mismatch: expected {expected} bytes, got {actual}")]
    BadPayloadSize { expected: usize, actual: usize },

    #[error("log: offset {offset} out of range (next offset is {next_offset})")]
    OffsetOutOfRange { offset: u64, next_offset: u64 },

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("log: corrupt record at offset {offset}: stored crc {stored:#010x}, computed {computed:#010x}")]
    CorruptRecord {
        offset: u64,
        stored: u32,
        computed: u32,
    },

    #[error("index: non-monotonic append: offset {attempted} is below last indexed offset {last}")]
    NonMonotonicIndex { last: u32, attempted: u32 },

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("log: closed")]
    Closed,

    #[error("file {} is already owned by another open handle", .path.display())]
    AlreadyOpen { path: PathBuf },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl LogError {
    /// Wrap an I/O error with the operation that produced it.
    pub(crate) fn io(context: &'static str, source: io::Error) -> Self {
        LogError::Io { context, source }
    }

    /// True when the underlying filesystem failed.
    pub fn is_io(&self) -> bool {
        matches!(self, LogError::Io { .. })
    }

    /// True when stored data failed its integrity check.
    pub fn is_corruption(&self) -> bool {
        matches!(self, LogError::CorruptRecord { .. })
    }
}
