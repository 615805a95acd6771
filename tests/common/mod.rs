//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber (once per test binary).
///
/// Output is controlled with `RUST_LOG`, e.g. `RUST_LOG=fixlog=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh temp directory plus a file path inside it
pub fn temp_path(name: &str) -> (TempDir, PathBuf) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    (temp_dir, path)
}

/// Read one byte of `path` at `pos` through a separate handle
pub fn read_byte_at(path: &Path, pos: u64) -> u8 {
    let mut file = File::open(path).unwrap();
    file.seek(SeekFrom::Start(pos)).unwrap();
    let mut byte = [0u8; 1];
    file.read_exact(&mut byte).unwrap();
    byte[0]
}

/// Overwrite bytes of `path` at `pos` through a separate handle
pub fn write_bytes_at(path: &Path, pos: u64, bytes: &[u8]) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(pos)).unwrap();
    file.write_all(bytes).unwrap();
}
