use std::sync::Arc;

use clap::Parser;

use gopherd::cli::Cli;
use gopherd::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    logging::init(settings.log_file.as_deref())?;

    let cfg = Arc::new(settings.into_config()?);
    tracing::info!(
        root = %cfg.root().display(),
        host = cfg.host(),
        port = cfg.port(),
        strict = cfg.strict(),
        blocked = cfg.blocklist().len(),
        "Configuration loaded"
    );

    tokio::select! {
        res = server::run(cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
