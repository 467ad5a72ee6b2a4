//! Per-class keyword contributions.

use ndarray::{Array1, ArrayView1};

use crate::{
    diagnosis::types::KeywordScore,
    nlp::{counts::KeywordCounts, features::FeatureVectorizer},
};

/// Positive keyword contributions to one class, split by evidence source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explanation {
    pub keywords: Vec<KeywordScore>,
    pub inferred_keywords: Vec<KeywordScore>,
}

/// Score each feature as `coefficient * value`, L2-normalise, scale by the
/// class probability and report the positive ones.
///
/// A keyword counted in `base` (before propagation) is literal; anything
/// else only has weight through a link and is reported as inferred.
pub fn explain(
    coefficients: ArrayView1<'_, f64>,
    probability: f64,
    features: ArrayView1<'_, f64>,
    vocabulary: &FeatureVectorizer,
    base: &KeywordCounts,
) -> Explanation {
    let mut scores: Array1<f64> = &coefficients * &features;
    let norm = scores.dot(&scores).sqrt();
    if norm > 0.0 {
        scores /= norm;
    }
    scores *= probability;

    let mut positive: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| *score > 0.0)
        .collect();
    // Stable sort keeps vocabulary order among ties.
    positive.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut explanation = Explanation::default();
    for (index, score) in positive {
        let Some(term) = vocabulary.term(index) else {
            continue;
        };
        let entry = KeywordScore {
            name: term.to_string(),
            score,
        };
        if base.contains(term) {
            explanation.keywords.push(entry);
        } else {
            explanation.inferred_keywords.push(entry);
        }
    }
    explanation
}
