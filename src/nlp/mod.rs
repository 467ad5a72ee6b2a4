//! Text-to-features layer: tokenising, keyword matching and count transforms.

pub mod counts;
pub mod features;
pub mod matcher;
pub mod stages;
pub mod tokenize;

pub use counts::KeywordCounts;
pub use features::FeatureVectorizer;
pub use matcher::KeywordMatcher;
pub use stages::{CountSaturator, LinkPropagator, Pipeline, Stage};
