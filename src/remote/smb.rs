use crate::remote::listing::{Layout, LineOutcome, ListingParser};
use crate::scanner::{Entry, EntrySink, ScanSummary, Scanner};
use crate::transport::Transport;
use crate::{ListerError, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Client command that lists the whole share recursively
pub const RECURSIVE_LISTING: &str = "recurse;dir";

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user: user.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct SmbRemote<'a> {
    conn: &'a dyn Transport,
    credentials: Credentials,
    layout: Layout,
}

impl<'a> SmbRemote<'a> {
    pub fn new(conn: &'a dyn Transport, credentials: Credentials) -> Self {
        Self { conn, credentials, layout: Layout::default() }
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// `<share> -U <user>%<password> -c "recurse;dir"`
    pub fn command_args(&self, share: &str) -> Vec<String> {
        vec![
            share.to_string(),
            "-U".to_string(),
            format!("{}%{}", self.credentials.user, self.credentials.password),
            "-c".to_string(),
            RECURSIVE_LISTING.to_string(),
        ]
    }

    fn parse(&self, output: &str, summary: &mut ScanSummary) -> Result<Vec<Entry>> {
        let mut parser = ListingParser::new(self.layout);
        let mut entries = Vec::new();
        for (idx, line) in output.lines().enumerate() {
            match parser.parse_line(idx + 1, line)? {
                LineOutcome::Entry(entry) => entries.push(entry),
                LineOutcome::Skipped => summary.skipped += 1,
                LineOutcome::Ignored => {}
            }
        }
        Ok(entries)
    }
}

impl<'a> Scanner for SmbRemote<'a> {
    fn scan(&mut self, path: &Path, sink: &mut EntrySink<'_>) -> Result<ScanSummary> {
        if self.credentials.user.is_empty() {
            return Err(ListerError::InvalidArgument("username must not be empty".into()));
        }
        // The share is a UNC string carried as a `Path` for the Scanner
        // seam; it always starts life as UTF-8 from the command line.
        let share = path
            .to_str()
            .ok_or_else(|| ListerError::InvalidArgument(format!("share path is not UTF-8: {:?}", path)))?;
        info!("Listing {} as {}", share, self.credentials.user);

        let output = self.conn.exec(&self.command_args(share))?;
        debug!("SMB client returned {} lines", output.lines().count());

        // The whole listing is validated before anything is emitted
        let mut summary = ScanSummary::default();
        for entry in self.parse(&output, &mut summary)? {
            summary.record(&entry);
            sink(entry)?;
        }
        Ok(summary)
    }
}
