//! Trained model artifact: vocabulary, weights, keyword specs and label hierarchy.

pub mod classifier;
pub mod hierarchy;
pub mod keywords;

use std::{collections::BTreeMap, fs::File, io::BufReader, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ModelError, nlp::features::FeatureVectorizer};

pub use classifier::{ClassProbability, Classifier, LinearClassifier, ProbabilityLink};
pub use hierarchy::{ClassTaxonomy, LabelHierarchy};
pub use keywords::{KeywordEntry, KeywordSpec, KeywordTable};

/// On-disk model artifact as produced by the training/ontology tooling.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelArtifact {
    pub classes: Vec<String>,
    pub vocabulary: Vec<String>,
    pub weights: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intercepts: Option<Vec<f64>>,
    pub keywords: Vec<KeywordSpec>,
    #[serde(default)]
    pub parents: BTreeMap<String, String>,
}

/// Artifact after validation, ready to be wired into an engine.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    pub keywords: KeywordTable,
    pub vectorizer: FeatureVectorizer,
    pub classifier: LinearClassifier,
    pub hierarchy: LabelHierarchy,
}

impl ModelArtifact {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let artifact = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            path = %path.display(),
            classes = artifact.classes.len(),
            vocabulary = artifact.vocabulary.len(),
            keywords = artifact.keywords.len(),
            "loaded model artifact"
        );
        Ok(artifact)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate dimensions, deduplicate keywords and check the hierarchy.
    pub fn compile(self, link: ProbabilityLink) -> Result<CompiledModel, ModelError> {
        let keywords = KeywordTable::build(&self.keywords)?;
        let vectorizer = FeatureVectorizer::new(
            self.vocabulary.iter().map(|term| keywords.canonicalize(term)),
        )?;
        let classifier = LinearClassifier::new(
            self.classes,
            self.weights,
            self.intercepts,
            vectorizer.len(),
            link,
        )?;
        let hierarchy = LabelHierarchy::new(self.parents)?;
        Ok(CompiledModel {
            keywords,
            vectorizer,
            classifier,
            hierarchy,
        })
    }
}
