//! Ratio-based, hierarchy-aware multi-label selection.

use std::collections::BTreeMap;

use crate::model::{ClassProbability, ClassTaxonomy};

/// A class chosen for the diagnosis with its resolved probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub class: usize,
    pub probability: f64,
    /// False when the class rode along as an ancestor of a selected class.
    pub direct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRule {
    pub cutoff_ratio: f64,
    pub augment_with_ancestors: bool,
}

impl SelectionRule {
    /// Select every class within `cutoff_ratio` of the best one, then
    /// optionally add the ancestors of those classes.
    ///
    /// Non-empty whenever `probabilities` is: the best class always clears
    /// its own cutoff. Output is ordered by probability, then class index.
    pub fn select(
        &self,
        probabilities: &[ClassProbability],
        taxonomy: &ClassTaxonomy,
    ) -> Vec<Selection> {
        let Some(p_max) = probabilities
            .iter()
            .map(|p| p.probability)
            .max_by(f64::total_cmp)
        else {
            return Vec::new();
        };
        let threshold = p_max * self.cutoff_ratio;
        let raw: BTreeMap<usize, f64> = probabilities
            .iter()
            .map(|p| (p.class, p.probability))
            .collect();

        let mut chosen: BTreeMap<usize, Selection> = BTreeMap::new();
        for p in probabilities.iter().filter(|p| p.probability >= threshold) {
            let entry = chosen.entry(p.class).or_insert(Selection {
                class: p.class,
                probability: p.probability,
                direct: true,
            });
            entry.direct = true;
            entry.probability = entry.probability.max(p.probability);
        }

        if self.augment_with_ancestors {
            let direct: Vec<Selection> = chosen.values().copied().filter(|s| s.direct).collect();
            for descendant in direct {
                for ancestor in taxonomy.ancestor_classes(descendant.class) {
                    let own = raw.get(&ancestor).copied().unwrap_or(0.0);
                    let entry = chosen.entry(ancestor).or_insert(Selection {
                        class: ancestor,
                        probability: own,
                        direct: false,
                    });
                    entry.probability = entry
                        .probability
                        .max(own)
                        .max(descendant.probability);
                }
            }
        }

        let mut selected: Vec<Selection> = chosen.into_values().collect();
        selected.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then(a.class.cmp(&b.class))
        });
        selected
    }
}
