use smblist::config::{parse_or_exit, LocalArgs, EXIT_FAILURE};
use smblist::engine::list_local;
use smblist::logging::init_logging;
use tracing::error;

fn main() -> anyhow::Result<()> {
    let args: LocalArgs = parse_or_exit();
    init_logging(args.verbosity)?;

    let stdout = std::io::stdout();
    if let Err(e) = list_local(&args, stdout.lock()) {
        error!("Listing failed: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}
