//! Index entry definitions

use bytes::{Buf, BufMut};

/// Size of one serialized entry: relative offset (4) + file position (8)
pub const ENTRY_SIZE: usize = 4 + 8;

/// Maps a record offset to the byte position of that record in its log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Record offset local to the paired log
    pub relative_offset: u32,

    /// Absolute byte position of that record in the log file
    pub file_position: u64,
}

impl IndexEntry {
    pub fn new(relative_offset: u32, file_position: u64) -> Self {
        Self {
            relative_offset,
            file_position,
        }
    }

    /// Write the 12-byte big-endian form into `buf`
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(self.relative_offset);
        buf.put_u64(self.file_position);
    }

    /// Serialized form
    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        self.encode_into(&mut &mut out[..]);
        out
    }

    /// Read one entry from the front of `buf`.
    ///
    /// Returns `None` if fewer than `ENTRY_SIZE` bytes remain.
    pub fn decode<B: Buf>(buf: &mut B) -> Option<Self> {
        if buf.remaining() < ENTRY_SIZE {
            return None;
        }
        let relative_offset = buf.get_u32();
        let file_position = buf.get_u64();
        Some(Self::new(relative_offset, file_position))
    }
}
