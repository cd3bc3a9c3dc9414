use chrono::NaiveDateTime;
use std::path::Path;
use crate::Result;

pub mod local;

pub use local::LocalScanner;

/// Kind of a listed item. Only files carry a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File { size: u64 },
    Directory,
}

/// One listed file or directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    /// Absolute path for local listings, share-relative for remote ones
    pub path: String,
    /// Modification time (local wall clock, second precision)
    pub modified_at: NaiveDateTime,
}

impl Entry {
    pub fn file(path: impl Into<String>, modified_at: NaiveDateTime, size: u64) -> Self {
        Self { kind: EntryKind::File { size }, path: path.into(), modified_at }
    }

    pub fn directory(path: impl Into<String>, modified_at: NaiveDateTime) -> Self {
        Self { kind: EntryKind::Directory, path: path.into(), modified_at }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self.kind {
            EntryKind::File { size } => Some(size),
            EntryKind::Directory => None,
        }
    }
}

/// Counts reported at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files: usize,
    pub directories: usize,
    /// Items dropped with a warning (unreadable, vanished, symlinks)
    pub skipped: usize,
}

impl ScanSummary {
    pub(crate) fn record(&mut self, entry: &Entry) {
        if entry.is_dir() {
            self.directories += 1;
        } else {
            self.files += 1;
        }
    }
}

/// Receives entries one at a time, in discovery order.
pub type EntrySink<'a> = dyn FnMut(Entry) -> Result<()> + 'a;

/// Scanner trait
pub trait Scanner {
    /// Walk `root`, handing every entry to `sink` as soon as it is known
    fn scan(&mut self, root: &Path, sink: &mut EntrySink<'_>) -> Result<ScanSummary>;

    /// Convenience wrapper that collects the whole listing
    fn scan_all(&mut self, root: &Path) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        self.scan(root, &mut |entry| {
            entries.push(entry);
            Ok(())
        })?;
        Ok(entries)
    }
}
