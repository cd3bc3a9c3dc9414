use crate::config::{LocalArgs, RemoteArgs};
use crate::remote::{Credentials, SmbRemote};
use crate::report::ReportWriter;
use crate::scanner::{LocalScanner, ScanSummary, Scanner};
use crate::transport::Transport;
use crate::Result;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Drive `scanner` over `root`, writing a report block per entry to `out`.
pub fn run_listing<W: Write>(scanner: &mut dyn Scanner, root: &Path, out: W) -> Result<ScanSummary> {
    let mut report = ReportWriter::new(out);
    let summary = scanner.scan(root, &mut |entry| Ok(report.write_entry(&entry)?))?;
    report.finish()?;

    info!(
        "Listed {} files and {} directories ({} skipped)",
        summary.files, summary.directories, summary.skipped
    );
    Ok(summary)
}

pub fn list_local<W: Write>(args: &LocalArgs, out: W) -> Result<ScanSummary> {
    let mut scanner = LocalScanner::new(args.exclude.clone()).follow_links(args.follow_links);
    run_listing(&mut scanner, &args.directory, out)
}

/// `password` is resolved by the caller (argument or prompt).
pub fn list_remote<W: Write>(
    args: &RemoteArgs,
    password: String,
    conn: &dyn Transport,
    out: W,
) -> Result<ScanSummary> {
    let credentials = Credentials::new(args.username.clone(), password);
    let mut remote = SmbRemote::new(conn, credentials).layout(args.layout);
    run_listing(&mut remote, Path::new(&args.share), out)
}
