use crate::scanner::{Entry, EntryKind};
use std::io::{self, Write};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Streams report blocks as entries arrive. Nothing is buffered or sorted.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_entry(&mut self, entry: &Entry) -> io::Result<()> {
        self.out.write_all(render(entry).as_bytes())
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Block for a single entry, trailing blank line included
pub fn render(entry: &Entry) -> String {
    let stamp = entry.modified_at.format(TIMESTAMP_FORMAT);
    match entry.kind {
        EntryKind::Directory => format!(
            "Directory: {}/\nModification Timestamp: {}\n\n",
            entry.path.trim_end_matches('/'),
            stamp
        ),
        EntryKind::File { size } => format!(
            "File: {}\nModification Timestamp: {}\nFile Size: {} bytes\n\n",
            entry.path, stamp, size
        ),
    }
}
