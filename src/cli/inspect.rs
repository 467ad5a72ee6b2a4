//! CLI entry-point for summarising a model artifact.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{cli::ModelArgs, config::Settings};

/// Args for the `inspect` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub model: ModelArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let engine = args.model.load_engine(&settings)?;
    super::print_json(&engine.summary(), true)
}
