//! # fixlog
//!
//! Durability core of a segmented, append-only log store:
//! - Fixed-size records with a CRC32C checksum each
//! - Crash recovery by truncating torn tails on open
//! - Configurable fsync policy (every write, every N writes, on an interval)
//! - Sparse offset index with floor lookups
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Segment layer (caller)                       │
//! │      naming, rotation, when to add index entries             │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ append / read                │ append_entry /
//!                │                              │ search_nearest
//!                ▼                              ▼
//!        ┌───────────────┐              ┌───────────────┐
//!        │   RecordLog   │              │  SparseIndex  │
//!        │   (RwLock)    │              │   (RwLock)    │
//!        └───────┬───────┘              └───────┬───────┘
//!                ▼                              ▼
//!          NNNNNNNN.log                   NNNNNNNN.index
//! ```
//!
//! The log and the index never reference each other. Pairing them is the
//! caller's job:
//!
//! ```no_run
//! use fixlog::{IndexEntry, LogConfig, RecordLog, SparseIndex};
//!
//! # fn main() -> fixlog::Result<()> {
//! let log = RecordLog::open(LogConfig::new("00000000.log", 16))?;
//! let index = SparseIndex::open("00000000.index")?;
//!
//! let offset = log.append(b"sixteen byte msg")?;
//! index.append_entry(IndexEntry::new(offset as u32, log.position_of(offset)))?;
//!
//! if let Some(entry) = index.search_nearest(offset as u32) {
//!     let payload = log.read(entry.relative_offset as u64)?;
//!     assert_eq!(payload, b"sixteen byte msg");
//! }
//! log.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checksum;
pub mod config;
pub mod error;

pub mod index;
pub mod log;

mod fileio;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use checksum::crc32c;
pub use config::{FsyncPolicy, LogConfig, LogConfigBuilder};
pub use error::{LogError, Result};
pub use index::{IndexEntry, SparseIndex};
pub use log::RecordLog;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fixlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
