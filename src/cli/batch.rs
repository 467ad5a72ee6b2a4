//! CLI entry-point for diagnosing a directory of documents concurrently.

use std::{
    path::{Path, PathBuf},
    pin::pin,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use futures::stream::{self, StreamExt};
use serde_json::json;
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::{cli::ModelArgs, config::Settings};

/// Args for the `batch` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub model: ModelArgs,
    /// Directory searched recursively for `.txt` documents.
    #[arg(long)]
    pub dir: PathBuf,
    /// Documents diagnosed in parallel. Falls back to DIAGNOSE_CONCURRENCY.
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let engine = Arc::new(args.model.load_engine(&settings)?);
    let documents = collect_documents(&args.dir)?;
    let concurrency = args.concurrency.unwrap_or(settings.concurrency).max(1);
    info!(documents = documents.len(), concurrency, "starting batch");

    let outcomes = stream::iter(documents)
        .map(|path| {
            let engine = Arc::clone(&engine);
            async move {
                let outcome = async {
                    let text = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    let result = tokio::task::spawn_blocking(move || engine.diagnose(&text))
                        .await
                        .context("diagnosis task panicked")??;
                    Ok::<_, anyhow::Error>(result)
                }
                .await;
                (path, outcome)
            }
        })
        .buffered(concurrency);
    let mut outcomes = pin!(outcomes);

    // Lines are printed in directory order as soon as each one is ready.
    let mut failed = 0usize;
    while let Some((path, outcome)) = outcomes.next().await {
        match outcome {
            Ok(result) => {
                let line = json!({ "document": path.display().to_string(), "result": result });
                println!("{line}");
            }
            Err(err) => {
                failed += 1;
                warn!(path = %path.display(), error = %format!("{err:#}"), "document failed");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} document(s) failed");
    }
    Ok(())
}

fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("txt")
        {
            documents.push(entry.into_path());
        }
    }
    Ok(documents)
}
