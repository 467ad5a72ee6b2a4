//! Entry point wiring CLI dispatch to the diagnosis engine.

use anyhow::Result;
use epi_diagnose::{cli::Cli, config::Settings, logging};
use tracing::{debug, instrument};

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_level())?;
    let settings = Settings::load()?;

    debug!(?cli, "starting command");
    cli.dispatch(settings).await
}
