//! Dense feature vectors in the model's fixed vocabulary order.

use indexmap::IndexSet;
use ndarray::Array1;

use crate::{error::ModelError, nlp::counts::KeywordCounts};

/// Vocabulary-ordered vectoriser; position `j` holds the count of term `j`.
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    vocabulary: IndexSet<String>,
}

impl FeatureVectorizer {
    pub fn new<I, S>(terms: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = IndexSet::new();
        for term in terms {
            let term = term.into();
            if vocabulary.contains(&term) {
                return Err(ModelError::DuplicateFeature(term));
            }
            vocabulary.insert(term);
        }
        if vocabulary.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }
        Ok(Self { vocabulary })
    }

    /// Keys outside the vocabulary are ignored.
    pub fn vectorize(&self, counts: &KeywordCounts) -> Array1<f64> {
        self.vocabulary.iter().map(|term| counts.get(term)).collect()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.vocabulary.get_index(index).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.vocabulary.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}
