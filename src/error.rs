use thiserror::Error;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum ListerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Dependency missing: {0}")]
    DependencyMissing(String),

    #[error("SMB client failed ({}): {stderr}", status_label(.status))]
    ClientFailed { status: Option<i32>, stderr: String },

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] globset::Error),
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}
