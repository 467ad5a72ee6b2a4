//! Linear multiclass classifier adapter.

use std::{fmt, str::FromStr};

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DiagnoseError, ModelError};

/// Probability assigned to one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbability {
    pub class: usize,
    pub probability: f64,
}

/// Trait for classifiers the diagnosis engine can drive.
pub trait Classifier: Send + Sync {
    fn labels(&self) -> &[String];

    /// Number of input features (columns of the weight matrix).
    fn n_features(&self) -> usize;

    /// One probability per class, each in [0, 1].
    fn predict_probabilities(
        &self,
        features: ArrayView1<'_, f64>,
    ) -> Result<Vec<ClassProbability>, DiagnoseError>;

    /// Per-feature coefficients for a class, aligned to the vocabulary.
    fn coefficients(&self, class: usize) -> Result<ArrayView1<'_, f64>, DiagnoseError>;
}

/// How raw linear scores become probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityLink {
    /// Independent sigmoid per class (one-vs-rest).
    #[default]
    Logistic,
    /// Normalised exponential across classes.
    Softmax,
}

#[derive(Debug, Error)]
#[error("unknown probability link {0:?}, expected `logistic` or `softmax`")]
pub struct ParseLinkError(String);

impl FromStr for ProbabilityLink {
    type Err = ParseLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logistic" => Ok(Self::Logistic),
            "softmax" => Ok(Self::Softmax),
            other => Err(ParseLinkError(other.to_string())),
        }
    }
}

impl fmt::Display for ProbabilityLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logistic => f.write_str("logistic"),
            Self::Softmax => f.write_str("softmax"),
        }
    }
}

/// Trained weight matrix `[class][feature]` plus per-class intercepts.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    labels: Vec<String>,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
    link: ProbabilityLink,
}

impl LinearClassifier {
    pub fn new(
        labels: Vec<String>,
        weights: Vec<Vec<f64>>,
        intercepts: Option<Vec<f64>>,
        n_features: usize,
        link: ProbabilityLink,
    ) -> Result<Self, ModelError> {
        if labels.is_empty() {
            return Err(ModelError::NoClasses);
        }
        if weights.len() != labels.len() {
            return Err(ModelError::DimensionMismatch {
                what: "weight rows vs classes",
                expected: labels.len(),
                found: weights.len(),
            });
        }
        if let Some(row) = weights.iter().find(|row| row.len() != n_features) {
            return Err(ModelError::DimensionMismatch {
                what: "weight columns vs vocabulary",
                expected: n_features,
                found: row.len(),
            });
        }
        let intercepts = match intercepts {
            Some(values) if values.len() != labels.len() => {
                return Err(ModelError::DimensionMismatch {
                    what: "intercepts vs classes",
                    expected: labels.len(),
                    found: values.len(),
                })
            }
            Some(values) => Array1::from(values),
            None => Array1::zeros(labels.len()),
        };

        let rows = weights.len();
        let flat: Vec<f64> = weights.into_iter().flatten().collect();
        let found = flat.len();
        let weights = Array2::from_shape_vec((rows, n_features), flat).map_err(|_| {
            ModelError::DimensionMismatch {
                what: "weight matrix shape",
                expected: rows * n_features,
                found,
            }
        })?;

        Ok(Self {
            labels,
            weights,
            intercepts,
            link,
        })
    }

    pub fn link(&self) -> ProbabilityLink {
        self.link
    }

    fn link_scores(&self, scores: Array1<f64>) -> Array1<f64> {
        match self.link {
            ProbabilityLink::Logistic => scores.mapv(sigmoid),
            ProbabilityLink::Softmax => {
                let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let exp = scores.mapv(|s| (s - max).exp());
                let total = exp.sum();
                exp / total
            }
        }
    }
}

impl Classifier for LinearClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    fn predict_probabilities(
        &self,
        features: ArrayView1<'_, f64>,
    ) -> Result<Vec<ClassProbability>, DiagnoseError> {
        if features.len() != self.n_features() {
            return Err(DiagnoseError::FeatureLength {
                expected: self.n_features(),
                found: features.len(),
            });
        }
        let scores = self.weights.dot(&features) + &self.intercepts;
        let probabilities = self.link_scores(scores);

        probabilities
            .iter()
            .enumerate()
            .map(|(class, &probability)| {
                if probability.is_finite() {
                    Ok(ClassProbability { class, probability })
                } else {
                    Err(DiagnoseError::NonFiniteProbability {
                        label: self.labels[class].clone(),
                    })
                }
            })
            .collect()
    }

    fn coefficients(&self, class: usize) -> Result<ArrayView1<'_, f64>, DiagnoseError> {
        if class >= self.weights.nrows() {
            return Err(DiagnoseError::UnknownClass(class));
        }
        Ok(self.weights.row(class))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
