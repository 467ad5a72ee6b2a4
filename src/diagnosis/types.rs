//! Serializable diagnosis output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub diseases: Vec<DiseaseGuess>,
    pub keywords_found: Vec<KeywordFound>,
}

impl DiagnosisResult {
    /// Highest-probability guess; present for every successful diagnosis.
    pub fn top(&self) -> Option<&DiseaseGuess> {
        self.diseases.first()
    }

    pub fn disease(&self, name: &str) -> Option<&DiseaseGuess> {
        self.diseases.iter().find(|d| d.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseGuess {
    pub name: String,
    pub probability: f64,
    /// Keywords the text literally mentions.
    pub keywords: Vec<KeywordScore>,
    /// Keywords present only through link propagation.
    pub inferred_keywords: Vec<KeywordScore>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeywordScore {
    pub name: String,
    pub score: f64,
}

/// A keyword matched in the text, before propagation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordFound {
    pub name: String,
    pub count: usize,
    pub categories: Vec<String>,
}
