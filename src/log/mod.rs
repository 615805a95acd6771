//! Record Log Module
//!
//! Durable append-only storage of fixed-size records.
//!
//! ## Responsibilities
//! - Append records and hand back their offset
//! - CRC32C checksum on every record, verified on every read
//! - Discard torn tails on open (crash recovery)
//! - Honour the configured fsync policy
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Record 0                             │
//! │ ┌──────────────┬───────────────────┐ │
//! │ │ CRC32C BE(4) │ Payload (N bytes) │ │
//! │ └──────────────┴───────────────────┘ │
//! ├──────────────────────────────────────┤
//! │ Record 1   @ 1 * (4 + N)             │
//! ├──────────────────────────────────────┤
//! │ ...                                  │
//! └──────────────────────────────────────┘
//! ```
//! No file header. The file length is always a multiple of `4 + N`; any
//! remainder found on open is a torn write and is cut off.

mod flusher;
mod record;
mod record_log;

pub use record::{encode_record, record_position, split_record, HEADER_SIZE};
pub use record_log::RecordLog;
