//! Sparse Index Module
//!
//! Maps a subset of record offsets to their byte positions so a reader can
//! jump close to any record and scan forward from there.
//!
//! ## Responsibilities
//! - Persist entries in append order
//! - Reject offsets that move backwards
//! - Floor lookup: greatest indexed offset not above a target
//!
//! ## File Format
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Entry 0                                       │
//! │ ┌─────────────────────┬─────────────────────┐ │
//! │ │ RelativeOffset BE(4)│ FilePosition BE(8)  │ │
//! │ └─────────────────────┴─────────────────────┘ │
//! ├───────────────────────────────────────────────┤
//! │ Entry 1   @ 12                                │
//! │ ...                                           │
//! └───────────────────────────────────────────────┘
//! ```
//! Entry `i` is always written at byte `i * 12`. Earlier entries are never
//! rewritten.

mod entry;
mod sparse;

pub use entry::{IndexEntry, ENTRY_SIZE};
pub use sparse::SparseIndex;
