//! Keyword-driven, explainable multi-label disease diagnosis.
//!
//! A [`DiagnosisEngine`] is compiled once from a [`ModelArtifact`] and then
//! shared read-only across any number of concurrent `diagnose` calls.

pub mod cli;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod logging;
pub mod model;
pub mod nlp;

pub use config::DiagnoserConfig;
pub use diagnosis::{DiagnosisEngine, DiagnosisResult, DiseaseGuess, KeywordScore};
pub use error::{DiagnoseError, ModelError};
pub use model::{KeywordSpec, ModelArtifact, ProbabilityLink};
