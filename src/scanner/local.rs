use crate::scanner::{Entry, EntrySink, ScanSummary, Scanner};
use crate::{ListerError, Result};
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

pub struct LocalScanner {
    excludes: Vec<String>,
    follow_links: bool,
}

impl LocalScanner {
    pub fn new(excludes: Vec<String>) -> Self {
        Self { excludes, follow_links: false }
    }

    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    fn build_excludes(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excludes {
            let glob = Glob::new(pattern)
                .map_err(|e| ListerError::Config(format!("invalid exclude pattern {:?}: {}", pattern, e)))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

impl Scanner for LocalScanner {
    fn scan(&mut self, path: &Path, sink: &mut EntrySink<'_>) -> Result<ScanSummary> {
        match std::fs::metadata(path) {
            Ok(md) if md.is_dir() => {}
            _ => return Err(ListerError::NotADirectory(path.to_path_buf())),
        }
        let root = path.canonicalize()?;
        let excludes = self.build_excludes()?;
        let mut summary = ScanSummary::default();

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| !is_excluded(&excludes, &root, e));

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(err.into());
                    }
                    warn!("Skipping unreadable entry: {}", err);
                    summary.skipped += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                warn!("Skipping symlink {:?}", entry.path());
                summary.skipped += 1;
                continue;
            }
            if !file_type.is_dir() && !file_type.is_file() {
                warn!("Skipping special file {:?}", entry.path());
                summary.skipped += 1;
                continue;
            }

            // Entries may vanish between readdir and stat
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!("Failed to get metadata for {:?}: {}", entry.path(), e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let modified_at = match metadata.modified() {
                Ok(t) => to_local_time(t),
                Err(e) => {
                    warn!("No modification time for {:?}: {}", entry.path(), e);
                    summary.skipped += 1;
                    continue;
                }
            };

            // A lossy name would point at a file that does not exist
            let path_str = match entry.path().to_str() {
                Some(p) => p.to_string(),
                None => {
                    warn!("Skipping non UTF-8 path {:?}", entry.path());
                    summary.skipped += 1;
                    continue;
                }
            };
            let item = if file_type.is_dir() {
                Entry::directory(path_str, modified_at)
            } else {
                Entry::file(path_str, modified_at, metadata.len())
            };

            summary.record(&item);
            sink(item)?;
        }

        debug!(
            "Scanned {:?}: {} files, {} directories, {} skipped",
            root, summary.files, summary.directories, summary.skipped
        );
        Ok(summary)
    }
}

fn is_excluded(excludes: &GlobSet, root: &Path, entry: &DirEntry) -> bool {
    if excludes.is_empty() {
        return false;
    }
    let relative = match entry.path().strip_prefix(root) {
        Ok(rp) => rp,
        Err(_) => return false,
    };
    let hit = excludes.is_match(relative) || excludes.is_match(entry.file_name());
    if hit {
        debug!("Excluded {:?}", relative);
    }
    hit
}

/// Converts a filesystem timestamp to local wall-clock time with whole seconds.
pub(crate) fn to_local_time(t: SystemTime) -> NaiveDateTime {
    let local: DateTime<Local> = t.into();
    let naive = local.naive_local();
    naive.with_nanosecond(0).unwrap_or(naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("top.txt"), b"hello").unwrap();
        fs::write(root.join("sub/with space.txt"), vec![0u8; 1024]).unwrap();
        fs::write(root.join("sub/deeper/new\nline"), b"").unwrap();
    }

    #[test]
    fn lists_every_descendant_once() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let entries = LocalScanner::new(vec![]).scan_all(dir.path()).unwrap();

        let files: Vec<_> = entries.iter().filter(|e| !e.is_dir()).collect();
        let dirs: Vec<_> = entries.iter().filter(|e| e.is_dir()).collect();
        assert_eq!(files.len(), 3);
        assert_eq!(dirs.len(), 2);

        let root = dir.path().canonicalize().unwrap();
        assert!(entries.iter().all(|e| e.path != root.to_string_lossy()));
    }

    #[test]
    fn sizes_and_paths_match_disk() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        for entry in LocalScanner::new(vec![]).scan_all(dir.path()).unwrap() {
            let p = Path::new(&entry.path);
            assert!(p.is_absolute(), "{} is relative", entry.path);
            let md = fs::symlink_metadata(p).unwrap();
            match entry.size_bytes() {
                Some(size) => assert_eq!(size, md.len()),
                None => assert!(md.is_dir()),
            }
        }
    }

    #[test]
    fn rejects_non_directory_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let err = LocalScanner::new(vec![]).scan_all(&file).unwrap_err();
        assert!(matches!(err, ListerError::NotADirectory(_)));

        let err = LocalScanner::new(vec![]).scan_all(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ListerError::NotADirectory(_)));
    }

    #[test]
    fn excluded_directory_is_pruned() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let entries = LocalScanner::new(vec!["sub".into()]).scan_all(dir.path()).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.ends_with("top.txt"));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let dir = tempdir().unwrap();
        let err = LocalScanner::new(vec!["a[".into()]).scan_all(dir.path()).unwrap_err();
        assert!(matches!(err, ListerError::Config(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped_by_default() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());
        std::os::unix::fs::symlink(dir.path().join("top.txt"), dir.path().join("link")).unwrap();

        let mut scanner = LocalScanner::new(vec![]);
        let mut seen = Vec::new();
        let summary = scanner
            .scan(dir.path(), &mut |e| {
                seen.push(e);
                Ok(())
            })
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files, 3);
        assert!(seen.iter().all(|e| !e.path.ends_with("link")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xffname")), b"x").unwrap();
        fs::write(dir.path().join("good"), b"y").unwrap();

        let mut scanner = LocalScanner::new(vec![]);
        let mut seen = Vec::new();
        let summary = scanner
            .scan(dir.path(), &mut |e| {
                seen.push(e);
                Ok(())
            })
            .unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(summary.skipped, 1);
        assert!(seen.iter().all(|e| Path::new(&e.path).exists()));
        assert!(!seen.iter().any(|e| e.path.contains('\u{FFFD}')));
    }

    #[cfg(unix)]
    #[test]
    fn followed_link_loop_is_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/back")).unwrap();

        let mut scanner = LocalScanner::new(vec![]).follow_links(true);
        let summary = scanner.scan(dir.path(), &mut |_| Ok(())).unwrap();

        assert_eq!(summary.directories, 1);
        assert_eq!(summary.skipped, 1);
    }
}
