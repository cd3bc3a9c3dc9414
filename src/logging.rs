use crate::config::Verbosity;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global subscriber. Logs go to stderr so the report on
/// stdout stays clean. `RUST_LOG` overrides the flag-derived level.
pub fn init_logging(verbosity: Verbosity) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbosity.verbose {
        Level::DEBUG
    } else if verbosity.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_ascii_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
