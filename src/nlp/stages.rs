//! Count-map transforms applied between extraction and vectorisation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use tracing::trace;

use crate::{error::ModelError, nlp::counts::KeywordCounts};

/// A single transform over a keyword count map.
pub trait Stage: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn apply(&self, counts: KeywordCounts) -> KeywordCounts;
}

/// Adds each matched keyword's weighted count to its linked keywords.
#[derive(Debug, Clone)]
pub struct LinkPropagator {
    links: BTreeMap<String, BTreeSet<String>>,
    weight: f64,
}

impl LinkPropagator {
    /// `links` is keyed by lowercased source keyword.
    pub fn new(links: BTreeMap<String, BTreeSet<String>>, weight: f64) -> Self {
        Self { links, weight }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Stage for LinkPropagator {
    fn name(&self) -> &'static str {
        "propagate"
    }

    fn apply(&self, counts: KeywordCounts) -> KeywordCounts {
        let mut propagated = counts.clone();
        for (key, count) in counts.iter().filter(|(_, count)| *count > 0.0) {
            let Some(targets) = self.links.get(&key.to_lowercase()) else {
                continue;
            };
            for target in targets {
                propagated.add(target.as_str(), count * self.weight);
            }
        }
        propagated
    }
}

/// Caps every count at `max_count`.
#[derive(Debug, Clone, Copy)]
pub struct CountSaturator {
    max_count: f64,
}

impl CountSaturator {
    pub fn new(max_count: f64) -> Result<Self, ModelError> {
        if max_count.is_nan() || max_count <= 0.0 {
            return Err(ModelError::InvalidSaturation(max_count));
        }
        Ok(Self { max_count })
    }

    pub fn max_count(&self) -> f64 {
        self.max_count
    }
}

impl Stage for CountSaturator {
    fn name(&self) -> &'static str {
        "saturate"
    }

    fn apply(&self, mut counts: KeywordCounts) -> KeywordCounts {
        for value in counts.values_mut() {
            *value = value.min(self.max_count);
        }
        counts
    }
}

/// Ordered list of stages run back to back.
#[derive(Debug, Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn run(&self, counts: KeywordCounts) -> KeywordCounts {
        self.stages.iter().fold(counts, |counts, stage| {
            let out = stage.apply(counts);
            trace!(stage = stage.name(), keys = out.len(), "applied stage");
            out
        })
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}
