//! Keyword specifications and the deduplicated keyword table compiled from them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One keyword as it ships in the model artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordSpec {
    #[serde(rename = "keyword", alias = "text")]
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub linked_keywords: BTreeSet<String>,
}

impl KeywordSpec {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            case_sensitive: false,
            linked_keywords: BTreeSet::new(),
        }
    }

    /// Mark the keyword as matching only its exact casing.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    pub fn linked_to<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.linked_keywords.extend(targets.into_iter().map(Into::into));
        self
    }
}

/// Effective matcher entry after merging duplicate specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Canonical key: exact text when case-sensitive, lowercased otherwise.
    pub key: String,
    pub case_sensitive: bool,
    pub categories: BTreeSet<String>,
}

/// Immutable, deduplicated view over the artifact's keyword specs.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
    exact_terms: HashSet<String>,
    links: BTreeMap<String, BTreeSet<String>>,
    categories: BTreeMap<String, BTreeSet<String>>,
}

/// Canonical count-map key for a keyword with the given case policy.
pub fn canonical_key(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

impl KeywordTable {
    /// Merge specs sharing a canonical key and case policy into one entry each.
    pub fn build(specs: &[KeywordSpec]) -> Result<Self, ModelError> {
        if specs.is_empty() {
            return Err(ModelError::EmptyKeywordSet);
        }

        let mut merged: IndexMap<(String, bool), (KeywordEntry, BTreeSet<String>)> =
            IndexMap::new();
        for (idx, spec) in specs.iter().enumerate() {
            let text = spec.text.trim();
            if text.is_empty() {
                return Err(ModelError::EmptyKeyword(idx));
            }
            let key = canonical_key(text, spec.case_sensitive);
            let (entry, links) = merged
                .entry((key.clone(), spec.case_sensitive))
                .or_insert_with(|| {
                    (
                        KeywordEntry {
                            key,
                            case_sensitive: spec.case_sensitive,
                            categories: BTreeSet::new(),
                        },
                        BTreeSet::new(),
                    )
                });
            if !spec.category.trim().is_empty() {
                entry.categories.insert(spec.category.trim().to_string());
            }
            links.extend(
                spec.linked_keywords
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }

        let exact_terms: HashSet<String> = merged
            .values()
            .filter(|(entry, _)| entry.case_sensitive)
            .map(|(entry, _)| entry.key.clone())
            .collect();

        let mut table = Self {
            entries: Vec::with_capacity(merged.len()),
            exact_terms,
            links: BTreeMap::new(),
            categories: BTreeMap::new(),
        };

        for (_, (entry, raw_links)) in merged {
            // Link sources are looked up case-insensitively.
            let targets: BTreeSet<String> =
                raw_links.iter().map(|t| table.canonicalize(t)).collect();
            if !targets.is_empty() {
                table
                    .links
                    .entry(entry.key.to_lowercase())
                    .or_default()
                    .extend(targets);
            }
            table
                .categories
                .entry(entry.key.clone())
                .or_default()
                .extend(entry.categories.iter().cloned());
            table.entries.push(entry);
        }

        Ok(table)
    }

    /// Canonical form of an arbitrary term (vocabulary entry or link target).
    pub fn canonicalize(&self, term: &str) -> String {
        let term = term.trim();
        if self.exact_terms.contains(term) {
            term.to_string()
        } else {
            term.to_lowercase()
        }
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outgoing links keyed by lowercased source keyword.
    pub fn links(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.links
    }

    pub fn categories(&self, key: &str) -> Vec<String> {
        self.categories
            .get(key)
            .map(|c| c.iter().cloned().collect())
            .unwrap_or_default()
    }
}
