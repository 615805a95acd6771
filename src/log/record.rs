//! Record layout
//!
//! `[crc32c(payload): u32 BE][payload: N bytes]`, packed back to back from
//! byte 0 with no file header.

use bytes::{BufMut, BytesMut};

use crate::checksum::crc32c;

/// Checksum header size in bytes
pub const HEADER_SIZE: usize = 4;

/// Byte position of the record at `offset` for records of `full_record_size`
/// bytes (header included).
#[inline]
pub fn record_position(offset: u64, full_record_size: usize) -> u64 {
    offset * full_record_size as u64
}

/// Build the on-disk bytes of one record.
///
/// One allocation sized for header and payload; the payload is copied in
/// directly behind the checksum.
pub fn encode_record(payload: &[u8]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u32(crc32c(payload));
    buf.put_slice(payload);
    buf
}

/// Split raw record bytes into the stored checksum and the payload.
///
/// `raw` must hold at least `HEADER_SIZE` bytes.
pub fn split_record(raw: &[u8]) -> (u32, &[u8]) {
    let (header, payload) = raw.split_at(HEADER_SIZE);
    let stored = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    (stored, payload)
}
