//! Error types for model construction and per-document diagnosis.

use thiserror::Error;

/// Failures raised while loading or compiling a model artifact.
///
/// All of these are fatal: an engine is never built from an artifact that
/// produced one.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model vocabulary is empty")]
    EmptyVocabulary,

    #[error("keyword specification list is empty")]
    EmptyKeywordSet,

    #[error("keyword spec #{0} has empty text")]
    EmptyKeyword(usize),

    #[error("vocabulary term {0:?} appears more than once")]
    DuplicateFeature(String),

    #[error("model declares no classes")]
    NoClasses,

    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("label hierarchy contains a cycle through {0:?}")]
    HierarchyCycle(String),

    #[error("cutoff ratio must lie in (0, 1], got {0}")]
    InvalidCutoffRatio(f64),

    #[error("link weight must be finite and non-negative, got {0}")]
    InvalidLinkWeight(f64),

    #[error("saturation ceiling must be positive, got {0}")]
    InvalidSaturation(f64),

    #[error("reading model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing model artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures raised while diagnosing a single document.
///
/// These only occur when the model is internally inconsistent; an ordinary
/// document, even an empty one, always diagnoses successfully.
#[derive(Debug, Error)]
pub enum DiagnoseError {
    #[error("feature vector has length {found}, model expects {expected}")]
    FeatureLength { expected: usize, found: usize },

    #[error("classifier produced a non-finite probability for {label:?}")]
    NonFiniteProbability { label: String },

    #[error("class index {0} is out of range")]
    UnknownClass(usize),
}
