//! Per-document keyword count map.

use std::collections::{btree_map, BTreeMap};

use serde::Serialize;

/// Keyword key to non-negative count. Ordered so iteration and
/// serialisation are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeywordCounts(BTreeMap<String, f64>);

impl KeywordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `key`, zero when absent.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    /// Whether `key` has a positive count.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key) > 0.0
    }

    pub fn add(&mut self, key: impl Into<String>, amount: f64) {
        *self.0.entry(key.into()).or_insert(0.0) += amount;
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.0.values_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Compact `key=count` rendering used in logs and snapshots.
    pub fn render(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for KeywordCounts {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (key, value) in iter {
            counts.add(key, value);
        }
        counts
    }
}

impl IntoIterator for KeywordCounts {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
