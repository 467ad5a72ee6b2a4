//! Diagnosis configuration and environment-backed CLI settings.

use std::{env, path::PathBuf, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{error::ModelError, model::ProbabilityLink};

/// Tunables passed explicitly to the engine at construction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnoserConfig {
    /// Fraction of the top probability another class must reach to be selected.
    pub cutoff_ratio: f64,
    /// Surface taxonomy ancestors of every directly selected class.
    pub augment_with_ancestors: bool,
    /// Multiplier applied when propagating counts along keyword links.
    pub link_weight: f64,
    /// Ceiling applied to every keyword count before vectorising.
    pub max_count: f64,
    pub link: ProbabilityLink,
}

impl Default for DiagnoserConfig {
    fn default() -> Self {
        Self {
            cutoff_ratio: 0.7,
            augment_with_ancestors: true,
            link_weight: 1.0,
            max_count: 1.0,
            link: ProbabilityLink::Logistic,
        }
    }
}

impl DiagnoserConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.cutoff_ratio.is_nan() || self.cutoff_ratio <= 0.0 || self.cutoff_ratio > 1.0 {
            return Err(ModelError::InvalidCutoffRatio(self.cutoff_ratio));
        }
        // Counts stay non-negative only if propagation cannot subtract.
        if !self.link_weight.is_finite() || self.link_weight < 0.0 {
            return Err(ModelError::InvalidLinkWeight(self.link_weight));
        }
        if self.max_count.is_nan() || self.max_count <= 0.0 {
            return Err(ModelError::InvalidSaturation(self.max_count));
        }
        Ok(())
    }
}

/// CLI settings resolved from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Model artifact used when `--model` is not given.
    pub model_path: Option<PathBuf>,
    pub diagnoser: DiagnoserConfig,
    /// Documents diagnosed in parallel by `batch`.
    pub concurrency: usize,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = DiagnoserConfig::default();

        let model_path = env::var("DIAGNOSE_MODEL_PATH").ok().map(PathBuf::from);
        let diagnoser = DiagnoserConfig {
            cutoff_ratio: parse_var("DIAGNOSE_CUTOFF_RATIO")?.unwrap_or(defaults.cutoff_ratio),
            augment_with_ancestors: parse_var("DIAGNOSE_AUGMENT_ANCESTORS")?
                .unwrap_or(defaults.augment_with_ancestors),
            link_weight: parse_var("DIAGNOSE_LINK_WEIGHT")?.unwrap_or(defaults.link_weight),
            max_count: parse_var("DIAGNOSE_MAX_COUNT")?.unwrap_or(defaults.max_count),
            link: parse_var("DIAGNOSE_LINK")?.unwrap_or(defaults.link),
        };
        let concurrency = parse_var("DIAGNOSE_CONCURRENCY")?.unwrap_or(4usize).max(1);

        Ok(Self {
            model_path,
            diagnoser,
            concurrency,
        })
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("parsing {name}={raw:?}")),
        _ => Ok(None),
    }
}
