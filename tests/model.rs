use std::collections::BTreeMap;
use std::io::Write;

use epi_diagnose::{
    model::{Classifier, LabelHierarchy, LinearClassifier},
    nlp::{FeatureVectorizer, KeywordCounts},
    DiagnoseError, ModelArtifact, ModelError, ProbabilityLink,
};
use ndarray::array;

mod common;

fn parents(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(child, parent)| (child.to_string(), parent.to_string()))
        .collect()
}

#[test]
fn vectorizer_follows_vocabulary_order_and_drops_unknown_keys() {
    let vectorizer = FeatureVectorizer::new(["flu", "cough", "fever"]).unwrap();
    let counts: KeywordCounts = [("fever", 1.0), ("flu", 2.0), ("ebola", 5.0)]
        .into_iter()
        .collect();
    assert_eq!(vectorizer.vectorize(&counts), array![2.0, 0.0, 1.0]);
    assert_eq!(vectorizer.term(1), Some("cough"));
    assert_eq!(vectorizer.index_of("fever"), Some(2));
}

#[test]
fn vectorizer_rejects_empty_and_duplicate_vocabularies() {
    assert!(matches!(
        FeatureVectorizer::new(Vec::<String>::new()),
        Err(ModelError::EmptyVocabulary)
    ));
    assert!(matches!(
        FeatureVectorizer::new(["flu", "flu"]),
        Err(ModelError::DuplicateFeature(term)) if term == "flu"
    ));
}

#[test]
fn classifier_checks_dimensions() {
    let labels = vec!["a".to_string(), "b".to_string()];
    let err = LinearClassifier::new(
        labels.clone(),
        vec![vec![1.0, 2.0]],
        None,
        2,
        ProbabilityLink::Logistic,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, found: 1, .. }));

    let err = LinearClassifier::new(
        labels.clone(),
        vec![vec![1.0, 2.0], vec![1.0]],
        None,
        2,
        ProbabilityLink::Logistic,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, found: 1, .. }));

    let err = LinearClassifier::new(
        labels,
        vec![vec![1.0], vec![1.0]],
        Some(vec![0.0]),
        1,
        ProbabilityLink::Logistic,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DimensionMismatch { .. }));

    assert!(matches!(
        LinearClassifier::new(vec![], vec![], None, 1, ProbabilityLink::Logistic),
        Err(ModelError::NoClasses)
    ));
}

#[test]
fn logistic_probabilities_are_independent_and_bounded() {
    let clf = LinearClassifier::new(
        vec!["Influenza".into(), "Common Cold".into()],
        vec![vec![2.0, 0.1], vec![0.1, 1.0]],
        None,
        2,
        ProbabilityLink::Logistic,
    )
    .unwrap();
    let probs = clf.predict_probabilities(array![1.0, 0.0].view()).unwrap();
    assert_eq!(probs.len(), 2);
    assert!((probs[0].probability - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
    assert!((probs[1].probability - 1.0 / (1.0 + (-0.1f64).exp())).abs() < 1e-12);
    assert!(probs[0].probability > probs[1].probability);
    assert_eq!(clf.coefficients(1).unwrap(), array![0.1, 1.0]);
}

#[test]
fn softmax_probabilities_sum_to_one() {
    let clf = LinearClassifier::new(
        vec!["a".into(), "b".into(), "c".into()],
        vec![vec![500.0], vec![0.0], vec![-500.0]],
        Some(vec![0.0, 1.0, 2.0]),
        1,
        ProbabilityLink::Softmax,
    )
    .unwrap();
    let probs = clf.predict_probabilities(array![1.0].view()).unwrap();
    let total: f64 = probs.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(&p.probability)));
}

#[test]
fn classifier_rejects_wrong_feature_length() {
    let clf = LinearClassifier::new(
        vec!["a".into()],
        vec![vec![1.0]],
        None,
        1,
        ProbabilityLink::Logistic,
    )
    .unwrap();
    assert!(matches!(
        clf.predict_probabilities(array![1.0, 2.0].view()),
        Err(DiagnoseError::FeatureLength { expected: 1, found: 2 })
    ));
    assert!(matches!(clf.coefficients(3), Err(DiagnoseError::UnknownClass(3))));
}

#[test]
fn probability_link_parses_from_text() {
    assert_eq!("Softmax".parse::<ProbabilityLink>().unwrap(), ProbabilityLink::Softmax);
    assert_eq!("logistic".parse::<ProbabilityLink>().unwrap(), ProbabilityLink::Logistic);
    assert!("probit".parse::<ProbabilityLink>().is_err());
    // Only the two documented spellings are accepted.
    for alias in ["sigmoid", "ovr", "multinomial"] {
        assert!(alias.parse::<ProbabilityLink>().is_err(), "{alias} should be rejected");
    }
}

#[test]
fn hierarchy_resolves_full_ancestor_chain() {
    let hierarchy = LabelHierarchy::new(parents(&[
        ("Hepatitis A", "Viral Hepatitis"),
        ("Viral Hepatitis", "Hepatitis"),
    ]))
    .unwrap();
    assert_eq!(hierarchy.parent("Hepatitis A"), Some("Viral Hepatitis"));
    assert_eq!(
        hierarchy.ancestors("Hepatitis A"),
        vec!["Viral Hepatitis", "Hepatitis"]
    );
    assert!(hierarchy.ancestors("Hepatitis").is_empty());
    assert_eq!(hierarchy.depth(), 2);
}

#[test]
fn hierarchy_cycles_fail_closed() {
    let err = LabelHierarchy::new(parents(&[("a", "b"), ("b", "c"), ("c", "a")])).unwrap_err();
    assert!(matches!(err, ModelError::HierarchyCycle(_)));
    assert!(LabelHierarchy::new(parents(&[("a", "a")])).is_err());
}

#[test]
fn artifact_loads_from_disk_and_compiles() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&common::flu_cold_artifact()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let artifact = ModelArtifact::from_path(file.path()).unwrap();
    assert_eq!(artifact.classes, vec!["Influenza", "Common Cold"]);
    let compiled = artifact.compile(ProbabilityLink::Logistic).unwrap();
    assert_eq!(compiled.vectorizer.len(), 2);
    assert_eq!(compiled.keywords.len(), 2);
    assert!(compiled.hierarchy.is_empty());
}

#[test]
fn artifact_vocabulary_is_canonicalised_against_keywords() {
    let compiled = common::sample_artifact()
        .compile(ProbabilityLink::Logistic)
        .unwrap();
    assert_eq!(compiled.vectorizer.index_of("influenza-like illness"), Some(1));
    assert_eq!(compiled.vectorizer.index_of("TB"), Some(6));
    assert_eq!(compiled.vectorizer.index_of("tb"), None);
}

#[test]
fn artifact_with_mismatched_weights_is_fatal() {
    let err = ModelArtifact::from_json_str(
        r#"{"classes":["a"],"vocabulary":["x","y"],"weights":[[1.0]],
            "keywords":[{"keyword":"x"}]}"#,
    )
    .unwrap()
    .compile(ProbabilityLink::Logistic)
    .unwrap_err();
    assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, found: 1, .. }));
}

#[test]
fn malformed_artifact_reports_parse_error() {
    assert!(matches!(
        ModelArtifact::from_json_str("{ not json"),
        Err(ModelError::Parse(_))
    ));
}
