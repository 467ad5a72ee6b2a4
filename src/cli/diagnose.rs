//! CLI entry-point for diagnosing a single document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

use crate::{cli::ModelArgs, config::Settings};

/// Args for the `diagnose` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub model: ModelArgs,
    /// Plain-text document; omitted or `-` reads stdin.
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// Pretty-print the JSON result.
    #[arg(long)]
    pub pretty: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let engine = args.model.load_engine(&settings)?;
    let text = read_input(args.input.as_deref()).await?;
    let result = engine.diagnose(&text)?;
    info!(
        diseases = result.diseases.len(),
        top = result.top().map(|d| d.name.as_str()).unwrap_or("-"),
        "diagnosed document"
    );
    super::print_json(&result, args.pretty)
}

async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
