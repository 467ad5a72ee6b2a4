//! Parent/ancestor relations between class labels.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::ModelError;

/// Single-parent label taxonomy, validated acyclic at construction.
#[derive(Debug, Clone, Default)]
pub struct LabelHierarchy {
    parents: BTreeMap<String, String>,
}

impl LabelHierarchy {
    pub fn new(parents: BTreeMap<String, String>) -> Result<Self, ModelError> {
        for start in parents.keys() {
            let mut seen: HashSet<&str> = HashSet::new();
            seen.insert(start.as_str());
            let mut current = start.as_str();
            while let Some(parent) = parents.get(current) {
                if !seen.insert(parent.as_str()) {
                    return Err(ModelError::HierarchyCycle(start.clone()));
                }
                current = parent;
            }
        }
        Ok(Self { parents })
    }

    pub fn parent(&self, label: &str) -> Option<&str> {
        self.parents.get(label).map(String::as_str)
    }

    /// Full ancestor chain, nearest parent first.
    pub fn ancestors(&self, label: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = label;
        while let Some(parent) = self.parent(current) {
            if parent == label || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Length of the longest ancestor chain.
    pub fn depth(&self) -> usize {
        self.parents
            .keys()
            .map(|label| self.ancestors(label).len())
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Class labels of a classifier joined with the label hierarchy.
#[derive(Debug, Clone)]
pub struct ClassTaxonomy {
    labels: Vec<String>,
    by_label: HashMap<String, Vec<usize>>,
    hierarchy: LabelHierarchy,
}

impl ClassTaxonomy {
    pub fn new(labels: Vec<String>, hierarchy: LabelHierarchy) -> Self {
        let mut by_label: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, label) in labels.iter().enumerate() {
            by_label.entry(label.clone()).or_default().push(idx);
        }
        Self {
            labels,
            by_label,
            hierarchy,
        }
    }

    pub fn label(&self, class: usize) -> Option<&str> {
        self.labels.get(class).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn hierarchy(&self) -> &LabelHierarchy {
        &self.hierarchy
    }

    /// Class indices whose label is an ancestor of `class`'s label.
    ///
    /// Ancestor labels that are not model classes are skipped.
    pub fn ancestor_classes(&self, class: usize) -> Vec<usize> {
        let Some(label) = self.label(class) else {
            return Vec::new();
        };
        self.hierarchy
            .ancestors(label)
            .into_iter()
            .filter_map(|ancestor| self.by_label.get(ancestor))
            .flatten()
            .copied()
            .collect()
    }
}
