//! CRC32C checksum
//!
//! Castagnoli polynomial. Used to stamp every record on append and to
//! re-derive the expected stamp on read.

/// CRC32C (Castagnoli) checksum of `data`.
///
/// `crc32c(b"")` is `0` and `crc32c(b"123456789")` is `0xE306_9283`.
#[inline]
pub fn crc32c(data: &[u8]) -> u32 {
    ::crc32c::crc32c(data)
}
