use crate::remote::Layout;
use clap::Parser;
use std::path::PathBuf;

/// Exit code for usage errors and failed runs
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug, Clone)]
#[command(name = "local-lister", author, version, about = "List every file and directory below a local path", long_about = None)]
pub struct LocalArgs {
    /// Directory to list
    #[arg(value_name = "DIRECTORY_PATH")]
    pub directory: PathBuf,

    /// Exclude patterns (glob, matched against the relative path or name)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Follow symbolic links instead of skipping them
    #[arg(short = 'L', long, default_value_t = false)]
    pub follow_links: bool,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "remote-lister", author, version, about = "List every file and directory on an SMB share", long_about = None)]
pub struct RemoteArgs {
    /// Share to list, e.g. //server/share
    #[arg(value_name = "SHARE_PATH")]
    pub share: String,

    /// User to authenticate as
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Password (prompted without echo when omitted)
    #[arg(value_name = "PASSWORD")]
    pub password: Option<String>,

    /// SMB client binary, looked up on PATH
    #[arg(long, default_value = "smbclient")]
    pub client: String,

    /// Layout of the client's listing output
    #[arg(long, value_enum, default_value_t = Layout::Compact)]
    pub layout: Layout,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    /// Suppress non-error messages
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Parse arguments, exiting with status 1 on usage errors.
/// `--help` and `--version` still exit 0.
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}
