//! Configuration for a record log
//!
//! Builder-style configuration with sensible defaults. Everything here is
//! validated before the log touches the filesystem.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LogError, Result};
use crate::log::HEADER_SIZE;

/// Configuration for one [`RecordLog`](crate::RecordLog) file
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Path of the log file (required)
    pub path: PathBuf,

    /// Fixed payload size of every record, in bytes (required, > 0)
    pub record_size: usize,

    /// When appended records are forced to stable storage
    pub fsync: FsyncPolicy,

    /// Reserved. Accepted but not acted on: growing the file ahead of time
    /// would defeat torn-tail detection, which relies on the file length.
    pub preallocate: bool,
}

/// Rule governing when buffered writes are forced to stable storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FsyncPolicy {
    /// fsync after every append (safest, slowest)
    #[default]
    Always,

    /// fsync once `count` appends are pending
    EveryN { count: usize },

    /// fsync pending appends from a background thread every `period`
    Interval { period: Duration },
}

impl FsyncPolicy {
    fn validate(&self) -> Result<()> {
        match *self {
            FsyncPolicy::Always => Ok(()),
            FsyncPolicy::EveryN { count: 0 } => Err(LogError::InvalidFsyncPolicy(
                "EveryN count must be > 0".to_string(),
            )),
            FsyncPolicy::EveryN { .. } => Ok(()),
            FsyncPolicy::Interval { period } if period.is_zero() => Err(
                LogError::InvalidFsyncPolicy("Interval period must be non-zero".to_string()),
            ),
            FsyncPolicy::Interval { .. } => Ok(()),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            record_size: 0,
            fsync: FsyncPolicy::Always,
            preallocate: false,
        }
    }
}

impl LogConfig {
    /// Config for `path` with `record_size`-byte payloads and default policy
    pub fn new(path: impl Into<PathBuf>, record_size: usize) -> Self {
        Self {
            path: path.into(),
            record_size,
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }

    /// Check every option without touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(LogError::FilePathRequired);
        }
        if self.record_size == 0 || self.record_size > usize::MAX - HEADER_SIZE {
            return Err(LogError::InvalidRecordSize {
                size: self.record_size,
            });
        }
        self.fsync.validate()
    }
}

/// Builder for LogConfig
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the fixed payload size (in bytes)
    pub fn record_size(mut self, size: usize) -> Self {
        self.config.record_size = size;
        self
    }

    /// Set the fsync policy
    pub fn fsync(mut self, policy: FsyncPolicy) -> Self {
        self.config.fsync = policy;
        self
    }

    /// Set the (reserved) preallocate flag
    pub fn preallocate(mut self, preallocate: bool) -> Self {
        self.config.preallocate = preallocate;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}
