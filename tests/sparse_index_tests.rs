//! Tests for the Sparse Index
//!
//! These tests verify:
//! - Entry encoding and on-disk placement
//! - Monotonic append rules
//! - Floor search
//! - Recovery on reopen (torn tail, unsorted file, duplicate offsets)

mod common;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use common::temp_path;
use fixlog::index::ENTRY_SIZE;
use fixlog::{IndexEntry, LogError, SparseIndex};

// =============================================================================
// Helper Functions
// =============================================================================

/// Index with entries at the given offsets, file position = offset * 20
fn index_with(path: &Path, offsets: &[u32]) -> SparseIndex {
    let index = SparseIndex::open(path).unwrap();
    for &offset in offsets {
        index
            .append_entry(IndexEntry::new(offset, offset as u64 * 20))
            .unwrap();
    }
    index
}

fn file_len(path: &Path) -> u64 {
    fs::metadata(path).unwrap().len()
}

// =============================================================================
// Entry Tests
// =============================================================================

#[test]
fn test_entry_layout() {
    let entry = IndexEntry::new(0x0102_0304, 0x1122_3344_5566_7788);
    assert_eq!(
        entry.to_bytes(),
        [0x01, 0x02, 0x03, 0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]
    );

    let bytes = entry.to_bytes();
    let mut buf = &bytes[..];
    assert_eq!(IndexEntry::decode(&mut buf), Some(entry));
    assert!(buf.is_empty());
}

#[test]
fn test_entry_decode_short_buffer() {
    let short = [0u8; ENTRY_SIZE - 1];
    let mut buf = &short[..];
    assert_eq!(IndexEntry::decode(&mut buf), None);
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_open_empty() {
    let (_temp, path) = temp_path("00000000.index");
    let index = SparseIndex::open(&path).unwrap();

    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert_eq!(index.last_relative_offset(), None);
    assert!(path.exists());
}

#[test]
fn test_append_writes_at_end() {
    let (_temp, path) = temp_path("append.index");
    let index = index_with(&path, &[0, 10, 20]);

    assert_eq!(index.len(), 3);
    assert_eq!(file_len(&path), 3 * ENTRY_SIZE as u64);

    // Every entry sits at i * ENTRY_SIZE; none was overwritten
    let bytes = fs::read(&path).unwrap();
    for (i, offset) in [0u32, 10, 20].iter().enumerate() {
        let start = i * ENTRY_SIZE;
        let expected = IndexEntry::new(*offset, *offset as u64 * 20).to_bytes();
        assert_eq!(&bytes[start..start + ENTRY_SIZE], &expected);
    }
}

#[test]
fn test_append_non_monotonic_rejected() {
    let (_temp, path) = temp_path("mono.index");
    let index = index_with(&path, &[5, 10]);

    let err = index.append_entry(IndexEntry::new(7, 140)).unwrap_err();
    assert!(matches!(
        err,
        LogError::NonMonotonicIndex {
            last: 10,
            attempted: 7
        }
    ));

    assert_eq!(index.len(), 2);
    assert_eq!(index.last_relative_offset(), Some(10));
    assert_eq!(file_len(&path), 2 * ENTRY_SIZE as u64);
}

#[test]
fn test_append_duplicate_is_noop() {
    let (_temp, path) = temp_path("dup.index");
    let index = index_with(&path, &[5, 10]);

    index.append_entry(IndexEntry::new(10, 9999)).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(file_len(&path), 2 * ENTRY_SIZE as u64);
    // The original entry wins
    assert_eq!(index.search_nearest(10), Some(IndexEntry::new(10, 200)));
}

#[test]
fn test_last_relative_offset() {
    let (_temp, path) = temp_path("last.index");
    let index = SparseIndex::open(&path).unwrap();

    assert_eq!(index.last_relative_offset(), None);
    index.append_entry(IndexEntry::new(3, 60)).unwrap();
    assert_eq!(index.last_relative_offset(), Some(3));
    index.append_entry(IndexEntry::new(8, 160)).unwrap();
    assert_eq!(index.last_relative_offset(), Some(8));
}

// =============================================================================
// Search Tests
// =============================================================================

#[test]
fn test_search_empty_index() {
    let (_temp, path) = temp_path("search_empty.index");
    let index = SparseIndex::open(&path).unwrap();

    assert_eq!(index.search_nearest(0), None);
    assert_eq!(index.search_nearest(u32::MAX), None);
}

#[test]
fn test_search_floor() {
    let (_temp, path) = temp_path("search.index");
    let index = index_with(&path, &[0, 10, 20, 30]);

    // Exact matches
    assert_eq!(index.search_nearest(0), Some(IndexEntry::new(0, 0)));
    assert_eq!(index.search_nearest(20), Some(IndexEntry::new(20, 400)));
    assert_eq!(index.search_nearest(30), Some(IndexEntry::new(30, 600)));

    // Between entries: greatest entry below the target
    assert_eq!(index.search_nearest(5), Some(IndexEntry::new(0, 0)));
    assert_eq!(index.search_nearest(19), Some(IndexEntry::new(10, 200)));
    assert_eq!(index.search_nearest(21), Some(IndexEntry::new(20, 400)));

    // Past the end
    assert_eq!(index.search_nearest(1_000), Some(IndexEntry::new(30, 600)));
}

#[test]
fn test_search_below_minimum() {
    let (_temp, path) = temp_path("below.index");
    let index = index_with(&path, &[100, 200]);

    assert_eq!(index.search_nearest(0), None);
    assert_eq!(index.search_nearest(99), None);
    assert_eq!(index.search_nearest(100), Some(IndexEntry::new(100, 2000)));
}

#[test]
fn test_search_single_entry() {
    let (_temp, path) = temp_path("single.index");
    let index = index_with(&path, &[42]);

    assert_eq!(index.search_nearest(41), None);
    assert_eq!(index.search_nearest(42), Some(IndexEntry::new(42, 840)));
    assert_eq!(index.search_nearest(43), Some(IndexEntry::new(42, 840)));
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_reopen_keeps_all_entries() {
    let (_temp, path) = temp_path("reopen.index");
    {
        let index = index_with(&path, &[0, 16, 32, 48]);
        index.sync().unwrap();
    }

    let index = SparseIndex::open(&path).unwrap();
    let offsets: Vec<u32> = index.entries().iter().map(|e| e.relative_offset).collect();
    assert_eq!(offsets, vec![0, 16, 32, 48]);
    assert_eq!(index.last_relative_offset(), Some(48));

    // Appends continue after the loaded entries
    index.append_entry(IndexEntry::new(64, 1280)).unwrap();
    drop(index);

    let index = SparseIndex::open(&path).unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(index.search_nearest(70), Some(IndexEntry::new(64, 1280)));
}

#[test]
fn test_torn_entry_truncated() {
    let (_temp, path) = temp_path("torn.index");
    drop(index_with(&path, &[1, 2, 3]));

    {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0xFF; 5]).unwrap();
    }

    let index = SparseIndex::open(&path).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(file_len(&path), 3 * ENTRY_SIZE as u64);
    assert_eq!(index.last_relative_offset(), Some(3));
}

#[test]
fn test_unsorted_file_sorted_on_load() {
    let (_temp, path) = temp_path("unsorted.index");

    let mut raw = Vec::new();
    for offset in [20u32, 0, 10] {
        raw.extend_from_slice(&IndexEntry::new(offset, offset as u64 * 20).to_bytes());
    }
    fs::write(&path, &raw).unwrap();

    let index = SparseIndex::open(&path).unwrap();
    let offsets: Vec<u32> = index.entries().iter().map(|e| e.relative_offset).collect();
    assert_eq!(offsets, vec![0, 10, 20]);
    assert_eq!(index.search_nearest(15), Some(IndexEntry::new(10, 200)));

    index.append_entry(IndexEntry::new(30, 600)).unwrap();
    assert_eq!(file_len(&path), 4 * ENTRY_SIZE as u64);
}

#[test]
fn test_duplicate_offsets_dropped_on_load() {
    let (_temp, path) = temp_path("dups.index");

    let mut raw = Vec::new();
    for (offset, position) in [(3u32, 60u64), (3, 999), (5, 100)] {
        raw.extend_from_slice(&IndexEntry::new(offset, position).to_bytes());
    }
    fs::write(&path, &raw).unwrap();

    let index = SparseIndex::open(&path).unwrap();
    assert_eq!(
        index.entries(),
        vec![IndexEntry::new(3, 60), IndexEntry::new(5, 100)]
    );
    assert_eq!(index.search_nearest(4), Some(IndexEntry::new(3, 60)));

    // New entries still go after every entry physically in the file
    index.append_entry(IndexEntry::new(7, 140)).unwrap();
    assert_eq!(file_len(&path), 4 * ENTRY_SIZE as u64);
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..3 * ENTRY_SIZE], &raw[..]);
    drop(index);

    let index = SparseIndex::open(&path).unwrap();
    let offsets: Vec<u32> = index.entries().iter().map(|e| e.relative_offset).collect();
    assert_eq!(offsets, vec![3, 5, 7]);
}

#[test]
fn test_second_owner_rejected() {
    let (_temp, path) = temp_path("owned.index");
    let index = SparseIndex::open(&path).unwrap();

    assert!(matches!(
        SparseIndex::open(&path),
        Err(LogError::AlreadyOpen { .. })
    ));

    drop(index);
    assert!(SparseIndex::open(&path).is_ok());
}
