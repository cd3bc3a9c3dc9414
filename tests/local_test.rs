use anyhow::Result;
use clap::Parser;
use smblist::config::LocalArgs;
use smblist::engine::list_local;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_block_counts_match_tree() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();

    // 3 directories, 4 files
    fs::create_dir_all(root.join("music/live"))?;
    fs::create_dir_all(root.join("empty"))?;
    fs::write(root.join("readme"), "hi")?;
    fs::write(root.join("music/a.flac"), vec![1u8; 4096])?;
    fs::write(root.join("music/live/b c.flac"), vec![2u8; 10])?;
    fs::write(root.join("music/live/.hidden"), "")?;

    let args = LocalArgs::try_parse_from(["local-lister", root.to_str().unwrap()])?;
    let mut out = Vec::new();
    let summary = list_local(&args, &mut out)?;
    let text = String::from_utf8(out)?;

    assert_eq!(summary.files, 4);
    assert_eq!(summary.directories, 3);
    assert_eq!(text.lines().filter(|l| l.starts_with("File: ")).count(), 4);
    assert_eq!(text.lines().filter(|l| l.starts_with("Directory: ")).count(), 3);

    // Every block is well-formed and points at something real
    for block in text.split("\n\n").filter(|b| !b.is_empty()) {
        let lines: Vec<&str> = block.lines().collect();
        if let Some(dir) = lines[0].strip_prefix("Directory: ") {
            assert_eq!(lines.len(), 2);
            let dir = dir.strip_suffix('/').expect("directory path ends with /");
            assert!(Path::new(dir).is_absolute() && Path::new(dir).is_dir());
        } else {
            let file = lines[0].strip_prefix("File: ").expect("block starts with a kind");
            assert_eq!(lines.len(), 3);
            let size: u64 = lines[2]
                .strip_prefix("File Size: ")
                .and_then(|s| s.strip_suffix(" bytes"))
                .expect("size line")
                .parse()?;
            assert_eq!(size, fs::metadata(file)?.len());
        }
        assert!(lines[1].starts_with("Modification Timestamp: "));
    }

    Ok(())
}

#[test]
fn test_excludes_prune_subtrees() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    fs::create_dir_all(root.join("target/debug"))?;
    fs::write(root.join("target/debug/app"), "bin")?;
    fs::write(root.join("keep.rs"), "fn main() {}")?;
    fs::write(root.join("trace.log"), "x")?;

    let args = LocalArgs::try_parse_from([
        "local-lister",
        root.to_str().unwrap(),
        "--exclude",
        "target",
        "--exclude",
        "*.log",
    ])?;
    let mut out = Vec::new();
    let summary = list_local(&args, &mut out)?;

    assert_eq!(summary.files, 1);
    assert_eq!(summary.directories, 0);
    assert!(String::from_utf8(out)?.contains("keep.rs"));
    Ok(())
}
