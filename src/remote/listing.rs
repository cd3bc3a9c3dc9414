//! Parsers for the text that `smbclient -c "recurse;dir"` prints.
//!
//! Two layouts are understood:
//!
//! * `compact`: `<flag> <YYYY-MM-DD> <HH:MM:SS> [<size>] <name>`, where the
//!   flag is `D` (directory) or `A` (file). Lines with any other flag are
//!   ignored. The size is mandatory for files and optional for directories.
//! * `native`: smbclient's own column layout (`  %-30s%7.7s %8.0f  <date>`),
//!   with `\dir` header lines that set the directory for the entries below
//!   them. An empty attribute column marks a file with no attribute bits.
//!
//! The name is everything after the last fixed field, so runs of spaces
//! inside it survive. A line that claims to be an entry but does not fit
//! the grammar is a parse error.

use crate::scanner::Entry;
use crate::{ListerError, Result};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use tracing::{debug, warn};

const COMPACT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NATIVE_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Layout {
    #[default]
    Compact,
    Native,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Entry(Entry),
    /// The client reported a per-directory failure; that subtree is missing
    Skipped,
    Ignored,
}

pub struct ListingParser {
    layout: Layout,
    /// Share-relative directory of the entries being read (native layout)
    current_dir: String,
}

impl ListingParser {
    pub fn new(layout: Layout) -> Self {
        Self { layout, current_dir: String::new() }
    }

    /// Parse one line. `line_no` is 1-based and only used for errors.
    pub fn parse_line(&mut self, line_no: usize, line: &str) -> Result<LineOutcome> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return Ok(LineOutcome::Ignored);
        }
        // Entry names may contain anything, status text included
        if !self.is_entry_line(line) {
            if let Some(outcome) = check_status(line)? {
                return Ok(outcome);
            }
        }
        match self.layout {
            Layout::Compact => parse_compact(line_no, line),
            Layout::Native => self.parse_native(line_no, line),
        }
    }

    fn is_entry_line(&self, line: &str) -> bool {
        match self.layout {
            Layout::Compact => matches!(line.split_whitespace().next(), Some("D" | "A")),
            Layout::Native => line.starts_with(char::is_whitespace),
        }
    }

    fn parse_native(&mut self, line_no: usize, line: &str) -> Result<LineOutcome> {
        if let Some(dir) = line.strip_prefix('\\') {
            self.current_dir = dir.trim_matches('\\').replace('\\', "/");
            return Ok(LineOutcome::Ignored);
        }
        // Banner lines start at column 0, entries are indented
        if !line.starts_with(char::is_whitespace) {
            debug!("Ignoring client output: {}", line);
            return Ok(LineOutcome::Ignored);
        }
        if line.contains("blocks of size") && line.contains("blocks available") {
            return Ok(LineOutcome::Ignored);
        }

        let fields = split_fields(line);
        if fields.len() < 7 {
            return Err(parse_error(line_no, "expected name, attributes, size and date"));
        }
        let n = fields.len();
        let date = fields[n - 5..].iter().map(|(_, f)| *f).collect::<Vec<_>>().join(" ");
        let modified_at = NaiveDateTime::parse_from_str(&date, NATIVE_TIME_FORMAT)
            .map_err(|e| parse_error(line_no, &format!("bad timestamp {:?}: {}", date, e)))?;
        let (size_at, raw_size) = fields[n - 6];
        let size = parse_size(line_no, raw_size)?;

        // smbclient prints "  %-30s%7.7s %8.0f  <date>": the attribute
        // column ends one space before the right-aligned size field.
        // An empty column means no attribute bits are set.
        let size_column = (size_at + raw_size.len()).saturating_sub(8).min(size_at);
        let (name_end, attrs) = match fields.get(n - 7) {
            Some(&(at, token))
                if n >= 8
                    && at + token.len() + 1 == size_column
                    && token.chars().all(|c| c.is_ascii_uppercase()) =>
            {
                (at, token)
            }
            _ => (size_at, ""),
        };

        let name = line[..name_end].trim();
        if name.is_empty() {
            return Err(parse_error(line_no, "missing name"));
        }
        if name == "." || name == ".." {
            return Ok(LineOutcome::Ignored);
        }
        let path = if self.current_dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.current_dir, name)
        };

        Ok(LineOutcome::Entry(if attrs.contains('D') {
            Entry::directory(path, modified_at)
        } else {
            Entry::file(path, modified_at, size)
        }))
    }
}

fn parse_compact(line_no: usize, line: &str) -> Result<LineOutcome> {
    let fields = split_fields(line);
    let is_dir = match fields[0].1 {
        "D" => true,
        "A" => false,
        other => {
            debug!("Ignoring line with flag {:?}", other);
            return Ok(LineOutcome::Ignored);
        }
    };
    if fields.len() < 3 {
        return Err(parse_error(line_no, "missing modification time"));
    }
    let stamp = format!("{} {}", fields[1].1, fields[2].1);
    let modified_at = NaiveDateTime::parse_from_str(&stamp, COMPACT_TIME_FORMAT)
        .map_err(|e| parse_error(line_no, &format!("bad timestamp {:?}: {}", stamp, e)))?;

    let name_field = if is_dir {
        // Directory size is usually "0" but may be blank
        match fields.get(3) {
            Some((_, size)) if fields.len() > 4 && size.bytes().all(|b| b.is_ascii_digit()) => 4,
            _ => 3,
        }
    } else {
        4
    };
    let size = if is_dir {
        None
    } else {
        let (_, raw) = fields.get(3).ok_or_else(|| parse_error(line_no, "missing file size"))?;
        Some(parse_size(line_no, raw)?)
    };
    let (name_at, _) = fields
        .get(name_field)
        .ok_or_else(|| parse_error(line_no, "missing name"))?;
    let name = &line[*name_at..];

    Ok(LineOutcome::Entry(match size {
        Some(size) => Entry::file(name, modified_at, size),
        None => Entry::directory(name, modified_at),
    }))
}

/// Tells apart a whole-run failure from a directory the client could not
/// read. `NT_STATUS_NO_SUCH_FILE` while listing just means an empty folder.
///
/// Only lines that begin with a status code, or name one right after a
/// failure prefix (`tree connect failed: NT_STATUS_...`,
/// `(Error NT_STATUS_...)`), count as client diagnostics.
fn check_status(line: &str) -> Result<Option<LineOutcome>> {
    const FAILURE_PREFIXES: [&str; 3] = ["failed: ", "Error ", "error "];

    let trimmed = line.trim_start();
    let at = if trimmed.starts_with("NT_STATUS_") {
        line.len() - trimmed.len()
    } else {
        let found = line.match_indices("NT_STATUS_").map(|(i, _)| i).find(|&i| {
            FAILURE_PREFIXES.iter().any(|p| line[..i].ends_with(p))
        });
        match found {
            Some(i) => i,
            None => return Ok(None),
        }
    };

    let status = line[at..]
        .split(|c: char| c.is_whitespace() || c == ')')
        .next()
        .unwrap_or("");
    let rest = line[at + status.len()..].trim_start();
    if rest.starts_with("listing ") {
        if status == "NT_STATUS_NO_SUCH_FILE" {
            return Ok(Some(LineOutcome::Ignored));
        }
        warn!("SMB client could not list {}: {}", &rest["listing ".len()..], status);
        return Ok(Some(LineOutcome::Skipped));
    }
    Err(ListerError::ClientFailed { status: None, stderr: line.trim().to_string() })
}

/// Whitespace-separated fields with their byte offsets in `line`.
fn split_fields(line: &str) -> Vec<(usize, &str)> {
    let mut fields = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                fields.push((s, &line[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        fields.push((s, &line[s..]));
    }
    fields
}

fn parse_size(line_no: usize, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|_| parse_error(line_no, &format!("bad size {:?}", raw)))
}

fn parse_error(line: usize, reason: &str) -> ListerError {
    ListerError::Parse { line, reason: reason.to_string() }
}
