//! Analyzer module - answer scoring engine and grade aggregation

pub mod engine;
pub mod features;
pub mod rules;
pub mod scoring;

pub use engine::AnswerAnalyzer;
pub use features::{Feature, FeatureMatcher, FeatureSet, KeywordMatcher};
pub use scoring::{AggregateStats, GradeAggregator};
