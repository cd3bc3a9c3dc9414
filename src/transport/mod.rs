use crate::Result;

pub mod process;

pub use process::ProcessTransport;

/// Runs the external SMB client.
pub trait Transport {
    /// Run the client with `args` and return its standard output.
    /// A failing exit status must come back as `ListerError::ClientFailed`.
    fn exec(&self, args: &[String]) -> Result<String>;
}
