use anyhow::Context;
use smblist::config::{parse_or_exit, RemoteArgs, EXIT_FAILURE};
use smblist::engine::list_remote;
use smblist::logging::init_logging;
use smblist::transport::ProcessTransport;
use tracing::error;

fn main() -> anyhow::Result<()> {
    let args: RemoteArgs = parse_or_exit();
    init_logging(args.verbosity)?;

    // The client must exist before asking for a password
    let transport = match ProcessTransport::locate(&args.client) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => rpassword::prompt_password(format!("Password for {}: ", args.username))
            .context("failed to read password")?,
    };

    let stdout = std::io::stdout();
    if let Err(e) = list_remote(&args, password, &transport, stdout.lock()) {
        error!("Listing failed: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}
