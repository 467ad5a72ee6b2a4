//! Diagnosis engine: extract, propagate, saturate, vectorise, classify,
//! select and explain.

pub mod explain;
pub mod select;
pub mod types;

use std::{fmt, sync::Arc};

use ndarray::Array1;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::DiagnoserConfig,
    error::{DiagnoseError, ModelError},
    model::{ClassTaxonomy, Classifier, KeywordTable, LabelHierarchy, ModelArtifact},
    nlp::{
        CountSaturator, FeatureVectorizer, KeywordCounts, KeywordMatcher, LinkPropagator,
        Pipeline, Stage,
    },
};

pub use explain::{explain, Explanation};
pub use select::{Selection, SelectionRule};
pub use types::{DiagnosisResult, DiseaseGuess, KeywordFound, KeywordScore};

/// Intermediate products of one document, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Literal matches.
    pub base: KeywordCounts,
    /// After every count stage.
    pub augmented: KeywordCounts,
    pub features: Array1<f64>,
}

/// Shape of a built engine, for operators.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSummary {
    pub classes: usize,
    pub vocabulary: usize,
    pub keywords: usize,
    pub exact_phrases: usize,
    pub folded_phrases: usize,
    pub linked_sources: usize,
    pub hierarchy_labels: usize,
    pub hierarchy_depth: usize,
    pub stages: Vec<&'static str>,
    pub config: DiagnoserConfig,
}

/// Immutable, thread-safe diagnosis engine. Build once, share via `Arc`.
pub struct DiagnosisEngine {
    keywords: KeywordTable,
    matcher: KeywordMatcher,
    pipeline: Pipeline,
    vectorizer: FeatureVectorizer,
    classifier: Arc<dyn Classifier>,
    taxonomy: ClassTaxonomy,
    rule: SelectionRule,
    config: DiagnoserConfig,
}

impl fmt::Debug for DiagnosisEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosisEngine")
            .field("classes", &self.taxonomy.labels())
            .field("vocabulary", &self.vectorizer.len())
            .field("pipeline", &self.pipeline)
            .field("rule", &self.rule)
            .finish()
    }
}

impl DiagnosisEngine {
    /// Compile an artifact with its linear classifier.
    pub fn new(artifact: ModelArtifact, config: DiagnoserConfig) -> Result<Self, ModelError> {
        let model = artifact.compile(config.link)?;
        Self::from_parts(
            model.keywords,
            model.vectorizer,
            Arc::new(model.classifier),
            model.hierarchy,
            config,
        )
    }

    /// Assemble an engine around any classifier matching the vocabulary.
    pub fn from_parts(
        keywords: KeywordTable,
        vectorizer: FeatureVectorizer,
        classifier: Arc<dyn Classifier>,
        hierarchy: LabelHierarchy,
        config: DiagnoserConfig,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        if classifier.labels().is_empty() {
            return Err(ModelError::NoClasses);
        }
        if classifier.n_features() != vectorizer.len() {
            return Err(ModelError::DimensionMismatch {
                what: "classifier features vs vocabulary",
                expected: vectorizer.len(),
                found: classifier.n_features(),
            });
        }

        let matcher = KeywordMatcher::new(&keywords)?;
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(LinkPropagator::new(keywords.links().clone(), config.link_weight)),
            Box::new(CountSaturator::new(config.max_count)?),
        ];
        let taxonomy = ClassTaxonomy::new(classifier.labels().to_vec(), hierarchy);
        let rule = SelectionRule {
            cutoff_ratio: config.cutoff_ratio,
            augment_with_ancestors: config.augment_with_ancestors,
        };

        let engine = Self {
            keywords,
            matcher,
            pipeline: Pipeline::new(stages),
            vectorizer,
            classifier,
            taxonomy,
            rule,
            config,
        };
        let summary = engine.summary();
        info!(
            classes = summary.classes,
            vocabulary = summary.vocabulary,
            exact = summary.exact_phrases,
            folded = summary.folded_phrases,
            "diagnosis engine ready"
        );
        Ok(engine)
    }

    /// Run matching and count stages without classifying.
    pub fn analyze(&self, text: &str) -> Analysis {
        let base = self.matcher.extract(text);
        let augmented = self.pipeline.run(base.clone());
        let features = self.vectorizer.vectorize(&augmented);
        Analysis {
            base,
            augmented,
            features,
        }
    }

    pub fn diagnose(&self, text: &str) -> Result<DiagnosisResult, DiagnoseError> {
        let analysis = self.analyze(text);
        let probabilities = self
            .classifier
            .predict_probabilities(analysis.features.view())?;
        let selected = self.rule.select(&probabilities, &self.taxonomy);

        let diseases = selected
            .iter()
            .map(|selection| self.guess(selection, &analysis))
            .collect::<Result<Vec<_>, _>>()?;

        let keywords_found = analysis
            .base
            .iter()
            .map(|(name, count)| KeywordFound {
                name: name.to_string(),
                count: count.round() as usize,
                categories: self.keywords.categories(name),
            })
            .collect();

        debug!(
            matches = analysis.base.len(),
            selected = ?diseases.iter().map(|d: &DiseaseGuess| d.name.as_str()).collect::<Vec<_>>(),
            "diagnosed document"
        );
        Ok(DiagnosisResult {
            diseases,
            keywords_found,
        })
    }

    fn guess(
        &self,
        selection: &Selection,
        analysis: &Analysis,
    ) -> Result<DiseaseGuess, DiagnoseError> {
        let name = self
            .taxonomy
            .label(selection.class)
            .ok_or(DiagnoseError::UnknownClass(selection.class))?
            .to_string();
        let coefficients = self.classifier.coefficients(selection.class)?;
        if coefficients.len() != analysis.features.len() {
            return Err(DiagnoseError::FeatureLength {
                expected: analysis.features.len(),
                found: coefficients.len(),
            });
        }
        let Explanation {
            keywords,
            inferred_keywords,
        } = explain(
            coefficients,
            selection.probability,
            analysis.features.view(),
            &self.vectorizer,
            &analysis.base,
        );
        Ok(DiseaseGuess {
            name,
            probability: selection.probability,
            keywords,
            inferred_keywords,
        })
    }

    pub fn config(&self) -> &DiagnoserConfig {
        &self.config
    }

    pub fn summary(&self) -> EngineSummary {
        EngineSummary {
            classes: self.taxonomy.labels().len(),
            vocabulary: self.vectorizer.len(),
            keywords: self.keywords.len(),
            exact_phrases: self.matcher.exact_len(),
            folded_phrases: self.matcher.folding_len(),
            linked_sources: self.keywords.links().len(),
            hierarchy_labels: self.taxonomy.hierarchy().len(),
            hierarchy_depth: self.taxonomy.hierarchy().depth(),
            stages: self.pipeline.stage_names(),
            config: self.config,
        }
    }
}
