//! Sparse Index
//!
//! Loads every entry into memory on open; appends go to the end of the file.

use std::fs::File;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{LogError, Result};
use crate::fileio;

use super::entry::{IndexEntry, ENTRY_SIZE};

/// Sorted `offset → file position` entries backed by one index file
///
/// ## Concurrency:
/// - `append_entry` and `sync` take the lock exclusively
/// - Lookups take it shared
pub struct SparseIndex {
    path: PathBuf,
    inner: RwLock<IndexState>,
}

struct IndexState {
    file: File,
    /// Sorted ascending by relative offset, no duplicates
    entries: Vec<IndexEntry>,
    /// Entries physically in the file; the next write goes after them
    disk_entries: u64,
}

impl SparseIndex {
    /// Open or create the index at `path` and load all of its entries
    ///
    /// A trailing partial entry (torn write) is truncated away. Loaded
    /// entries are sorted by relative offset; if an offset appears more than
    /// once only the first one in file order is kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fileio::open_owned(path)?;

        let (kept, discarded) = fileio::truncate_to_multiple(&file, ENTRY_SIZE as u64)?;
        if discarded > 0 {
            warn!(
                path = %path.display(),
                discarded_bytes = discarded,
                "truncated partial index entry"
            );
        }

        let disk_entries = kept / ENTRY_SIZE as u64;
        let entries = Self::load_entries(&file, kept)?;
        if (entries.len() as u64) < disk_entries {
            warn!(
                path = %path.display(),
                duplicates = disk_entries - entries.len() as u64,
                "dropped duplicate index offsets"
            );
        }

        debug!(path = %path.display(), entries = entries.len(), "opened sparse index");

        Ok(Self {
            path: path.to_path_buf(),
            inner: RwLock::new(IndexState {
                file,
                entries,
                disk_entries,
            }),
        })
    }

    fn load_entries(file: &File, len: u64) -> Result<Vec<IndexEntry>> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut data = vec![0u8; len as usize];
        fileio::read_exact_at(file, &mut data, 0)
            .map_err(|e| LogError::io("loading index file", e))?;

        let mut buf = &data[..];
        let mut entries = Vec::with_capacity(data.len() / ENTRY_SIZE);
        while let Some(entry) = IndexEntry::decode(&mut buf) {
            entries.push(entry);
        }

        // Stable sort, so the first entry written for an offset is kept
        entries.sort_by_key(|e| e.relative_offset);
        entries.dedup_by_key(|e| e.relative_offset);
        Ok(entries)
    }

    /// Append an entry
    ///
    /// - Offset below the last entry: `NonMonotonicIndex`, nothing changes
    /// - Offset equal to the last entry: no-op
    /// - Otherwise the entry is written after all existing entries
    pub fn append_entry(&self, entry: IndexEntry) -> Result<()> {
        let mut inner = self.inner.write();

        if let Some(last) = inner.entries.last() {
            if entry.relative_offset < last.relative_offset {
                return Err(LogError::NonMonotonicIndex {
                    last: last.relative_offset,
                    attempted: entry.relative_offset,
                });
            }
            if entry.relative_offset == last.relative_offset {
                return Ok(());
            }
        }

        let pos = inner.disk_entries * ENTRY_SIZE as u64;
        fileio::write_all_at(&inner.file, &entry.to_bytes(), pos)
            .map_err(|e| LogError::io("appending index entry", e))?;

        inner.entries.push(entry);
        inner.disk_entries += 1;
        Ok(())
    }

    /// Entry with the greatest relative offset `<= target`
    ///
    /// `None` when the index is empty or `target` is below the first entry.
    pub fn search_nearest(&self, target: u32) -> Option<IndexEntry> {
        let inner = self.inner.read();
        let entries = &inner.entries;

        if entries.is_empty() || target < entries[0].relative_offset {
            return None;
        }

        // Count of entries <= target; at least 1 here
        let idx = entries.partition_point(|e| e.relative_offset <= target);
        Some(entries[idx - 1])
    }

    /// Offset of the most recently appended entry
    pub fn last_relative_offset(&self) -> Option<u32> {
        self.inner.read().entries.last().map(|e| e.relative_offset)
    }

    /// fsync the index file
    pub fn sync(&self) -> Result<()> {
        self.inner
            .write()
            .file
            .sync_all()
            .map_err(|e| LogError::io("syncing index file", e))
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Snapshot of all entries in offset order
    pub fn entries(&self) -> Vec<IndexEntry> {
        self.inner.read().entries.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
