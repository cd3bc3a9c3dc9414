use crate::transport::Transport;
use crate::{ListerError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Spawns a local client binary and buffers its output.
pub struct ProcessTransport {
    program: PathBuf,
}

impl ProcessTransport {
    /// Resolve `client` on `PATH` (or as a path) before anything runs.
    pub fn locate(client: &str) -> Result<Self> {
        let program = which::which(client)
            .map_err(|e| ListerError::DependencyMissing(format!("{}: {}", client, e)))?;
        debug!("Using SMB client at {:?}", program);
        Ok(Self { program })
    }
}

impl Transport for ProcessTransport {
    fn exec(&self, args: &[String]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(ListerError::ClientFailed {
                status: output.status.code(),
                stderr: if stderr.is_empty() { first_status_line(&stdout) } else { stderr },
            });
        }
        if !stderr.is_empty() {
            debug!("SMB client stderr: {}", stderr);
        }
        Ok(stdout)
    }
}

// smbclient sometimes reports failures on stdout only
fn first_status_line(stdout: &str) -> String {
    stdout
        .lines()
        .find(|l| l.contains("NT_STATUS_"))
        .unwrap_or("")
        .trim()
        .to_string()
}
