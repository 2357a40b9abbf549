//! Scoring rules for answer quality

pub mod feature_presence;
pub mod length;
pub mod structure;

pub use feature_presence::FeaturePresenceRule;
pub use length::LengthRule;
pub use structure::StructureRule;

use super::features::FeatureFlags;
use crate::Criterion;

/// What a rule sees of an answer
#[derive(Debug, Clone, Copy)]
pub struct AnswerContext<'a> {
    /// Full answer text, untrimmed
    pub text: &'a str,
    /// Topic label of the assignment
    pub topic: &'a str,
    pub word_count: usize,
    pub features: FeatureFlags,
}

/// Points and remark produced by one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    pub points: u8,
    pub remark: &'static str,
}

/// Trait for answer scoring rules
pub trait AnalysisRule: Send + Sync {
    /// Criterion this rule scores
    fn criterion(&self) -> Criterion;

    /// Maximum points this rule can award
    fn max_points(&self) -> u8;

    /// Score the answer. Every rule yields exactly one remark.
    fn evaluate(&self, answer: &AnswerContext<'_>) -> RuleOutcome;
}

/// The built-in rules in evaluation order
pub fn default_rules() -> Vec<Box<dyn AnalysisRule>> {
    vec![
        Box::new(LengthRule::new()),
        Box::new(FeaturePresenceRule::terminology()),
        Box::new(FeaturePresenceRule::examples()),
        Box::new(FeaturePresenceRule::analysis()),
        Box::new(StructureRule::new()),
    ]
}
