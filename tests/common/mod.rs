#![allow(dead_code)]

use epi_diagnose::{DiagnoserConfig, DiagnosisEngine, ModelArtifact};
use serde_json::json;

/// Two-class model from the influenza/common-cold scenario.
pub fn flu_cold_artifact() -> ModelArtifact {
    serde_json::from_value(json!({
        "classes": ["Influenza", "Common Cold"],
        "vocabulary": ["flu", "cough"],
        "weights": [[2.0, 0.1], [0.1, 1.0]],
        "keywords": [
            { "keyword": "flu", "category": "disease" },
            { "keyword": "cough", "category": "symptom" }
        ]
    }))
    .expect("valid artifact")
}

/// Model where `flu` links to `Influenza-like illness`.
pub fn linked_artifact() -> ModelArtifact {
    serde_json::from_value(json!({
        "classes": ["ILI", "Other"],
        "vocabulary": ["flu", "Influenza-like illness"],
        "weights": [[0.5, 2.0], [-1.0, -1.0]],
        "keywords": [
            { "keyword": "flu", "category": "disease", "linked_keywords": ["Influenza-like illness"] }
        ]
    }))
    .expect("valid artifact")
}

pub fn sample_artifact() -> ModelArtifact {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_model.json");
    ModelArtifact::from_path(path).expect("sample model loads")
}

pub fn engine(artifact: ModelArtifact) -> DiagnosisEngine {
    DiagnosisEngine::new(artifact, DiagnoserConfig::default()).expect("engine builds")
}
