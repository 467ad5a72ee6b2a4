//! Command-line interface wiring for epi-diagnose.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;

use crate::{
    config::{DiagnoserConfig, Settings},
    diagnosis::DiagnosisEngine,
    model::{ModelArtifact, ProbabilityLink},
};

pub mod batch;
pub mod diagnose;
pub mod inspect;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Explainable keyword-based disease diagnosis", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Diagnose(args) => diagnose::run(args, settings).await,
            Commands::Batch(args) => batch::run(args, settings).await,
            Commands::Inspect(args) => inspect::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Diagnose one document and print the result as JSON.
    Diagnose(diagnose::Args),
    /// Diagnose every `.txt` document under a directory, one JSON line each.
    Batch(batch::Args),
    /// Summarise a model artifact.
    Inspect(inspect::Args),
}

/// Model location and engine overrides shared by every sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct ModelArgs {
    /// Model artifact (JSON). Falls back to DIAGNOSE_MODEL_PATH.
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Fraction of the top probability a class must reach to be selected.
    #[arg(long)]
    pub cutoff_ratio: Option<f64>,
    /// Do not add taxonomy ancestors of selected classes.
    #[arg(long)]
    pub no_ancestors: bool,
    /// Weight applied when propagating counts along keyword links.
    #[arg(long)]
    pub link_weight: Option<f64>,
    /// Ceiling for every keyword count.
    #[arg(long)]
    pub max_count: Option<f64>,
    /// Probability link: `logistic` or `softmax`.
    #[arg(long)]
    pub link: Option<ProbabilityLink>,
}

impl ModelArgs {
    /// Environment settings with command-line overrides applied.
    pub fn config(&self, settings: &Settings) -> DiagnoserConfig {
        let base = settings.diagnoser;
        DiagnoserConfig {
            cutoff_ratio: self.cutoff_ratio.unwrap_or(base.cutoff_ratio),
            augment_with_ancestors: base.augment_with_ancestors && !self.no_ancestors,
            link_weight: self.link_weight.unwrap_or(base.link_weight),
            max_count: self.max_count.unwrap_or(base.max_count),
            link: self.link.unwrap_or(base.link),
        }
    }

    pub fn load_engine(&self, settings: &Settings) -> Result<DiagnosisEngine> {
        let path = self
            .model
            .clone()
            .or_else(|| settings.model_path.clone())
            .context("no model artifact: pass --model or set DIAGNOSE_MODEL_PATH")?;
        let artifact = ModelArtifact::from_path(&path)
            .with_context(|| format!("loading model {}", path.display()))?;
        DiagnosisEngine::new(artifact, self.config(settings))
            .with_context(|| format!("compiling model {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
