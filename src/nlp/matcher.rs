//! Two-tier keyword matcher: exact-case phrases and case-folded n-gram windows.

use std::collections::HashMap;

use tracing::warn;

use crate::{
    error::ModelError,
    model::KeywordTable,
    nlp::{counts::KeywordCounts, tokenize::tokenize},
};

/// Longest token window the folding matcher considers.
pub const MAX_FOLDED_TOKENS: usize = 5;

/// Token-joined phrase to every canonical keyword key sharing it.
#[derive(Debug, Clone, Default)]
struct PhraseIndex {
    phrases: HashMap<String, Vec<String>>,
    max_tokens: usize,
    fold: bool,
}

impl PhraseIndex {
    fn new(fold: bool) -> Self {
        Self {
            fold,
            ..Self::default()
        }
    }

    fn insert(&mut self, tokens: &[&str], key: &str) {
        let phrase = if self.fold {
            tokens
                .iter()
                .map(|t| t.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            tokens.join(" ")
        };
        self.max_tokens = self.max_tokens.max(tokens.len());
        let keys = self.phrases.entry(phrase).or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }

    /// Count every window of 1..=max_tokens tokens matching a phrase.
    /// Overlapping windows are counted independently.
    fn scan<S: AsRef<str>>(&self, tokens: &[S], counts: &mut KeywordCounts) {
        if self.phrases.is_empty() {
            return;
        }
        for start in 0..tokens.len() {
            let mut window = String::new();
            for token in tokens[start..].iter().take(self.max_tokens) {
                if !window.is_empty() {
                    window.push(' ');
                }
                window.push_str(token.as_ref());
                for key in self.phrases.get(&window).into_iter().flatten() {
                    counts.add(key.as_str(), 1.0);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.phrases.len()
    }
}

/// Compiled matcher over a keyword table.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    exact: PhraseIndex,
    folding: PhraseIndex,
}

impl KeywordMatcher {
    pub fn new(table: &KeywordTable) -> Result<Self, ModelError> {
        if table.is_empty() {
            return Err(ModelError::EmptyKeywordSet);
        }
        let mut exact = PhraseIndex::new(false);
        let mut folding = PhraseIndex::new(true);

        for entry in table.entries() {
            let tokens = tokenize(&entry.key);
            if tokens.is_empty() {
                warn!(keyword = %entry.key, "keyword has no word tokens; it can never match");
                continue;
            }
            if entry.case_sensitive {
                exact.insert(&tokens, &entry.key);
            } else if tokens.len() > MAX_FOLDED_TOKENS {
                warn!(
                    keyword = %entry.key,
                    tokens = tokens.len(),
                    "keyword exceeds the folding window; it can never match"
                );
            } else {
                folding.insert(&tokens, &entry.key);
            }
        }

        Ok(Self { exact, folding })
    }

    /// Count keyword occurrences in `text`.
    ///
    /// Exact-case matches overwrite folded matches that share a key.
    pub fn extract(&self, text: &str) -> KeywordCounts {
        let tokens = tokenize(text);

        let mut counts = KeywordCounts::new();
        let folded: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        self.folding.scan(&folded, &mut counts);

        let mut exact = KeywordCounts::new();
        self.exact.scan(&tokens, &mut exact);
        for (key, count) in exact {
            counts.insert(key, count);
        }
        counts
    }

    /// Number of distinct exact-case phrases.
    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }

    /// Number of distinct case-folded phrases.
    pub fn folding_len(&self) -> usize {
        self.folding.len()
    }
}
