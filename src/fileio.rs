//! File helpers shared by the record log and the sparse index
//!
//! Both components own exactly one file each. Ownership is enforced with an
//! advisory exclusive lock, and all record I/O is positional so shared
//! readers never fight over a file cursor.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

use crate::error::{LogError, Result};

/// Open (or create) `path` for read/write and take an exclusive advisory lock.
///
/// The lock is released when the returned `File` is dropped.
pub(crate) fn open_owned(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| LogError::io("opening file", e))?;

    if let Err(e) = file.try_lock_exclusive() {
        if e.kind() == fs2::lock_contended_error().kind() {
            return Err(LogError::AlreadyOpen {
                path: path.to_path_buf(),
            });
        }
        return Err(LogError::io("locking file", e));
    }

    Ok(file)
}

/// Cut `file` down to the largest multiple of `unit` bytes.
///
/// Returns `(kept_len, discarded_bytes)`. A non-zero remainder is what a
/// crash in the middle of a write leaves behind.
pub(crate) fn truncate_to_multiple(file: &File, unit: u64) -> Result<(u64, u64)> {
    let len = file
        .metadata()
        .map_err(|e| LogError::io("reading file metadata", e))?
        .len();

    let rem = len % unit;
    let kept = len - rem;
    if rem != 0 {
        file.set_len(kept)
            .map_err(|e| LogError::io("truncating torn tail", e))?;
        file.sync_all()
            .map_err(|e| LogError::io("syncing after truncation", e))?;
    }

    Ok((kept, rem))
}

#[cfg(unix)]
pub(crate) fn read_exact_at(file: &File, buf: &mut [u8], pos: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, pos)
}

#[cfg(unix)]
pub(crate) fn write_all_at(file: &File, buf: &[u8], pos: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, pos)
}

#[cfg(windows)]
pub(crate) fn read_exact_at(file: &File, mut buf: &mut [u8], mut pos: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, pos) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "failed to fill whole buffer",
                ))
            }
            Ok(n) => {
                buf = &mut buf[n..];
                pos += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(windows)]
pub(crate) fn write_all_at(file: &File, mut buf: &[u8], mut pos: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_write(buf, pos) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole buffer",
                ))
            }
            Ok(n) => {
                buf = &buf[n..];
                pos += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
