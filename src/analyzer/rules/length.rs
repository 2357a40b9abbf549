//! Answer length: rewards detailed answers by word count.

use super::{AnalysisRule, AnswerContext, RuleOutcome};
use crate::Criterion;

/// Word-count tiers, highest first: (minimum words, points, remark)
const TIERS: [(usize, u8, &str); 2] = [
    (200, 30, "Good length and detail"),
    (100, 20, "Adequate length but could be more detailed"),
];

const BRIEF_POINTS: u8 = 10;
const BRIEF_REMARK: &str = "Answer is too brief - aim for 200+ words";

/// Rule scoring answer length
pub struct LengthRule;

impl LengthRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LengthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRule for LengthRule {
    fn criterion(&self) -> Criterion {
        Criterion::Length
    }

    fn max_points(&self) -> u8 {
        TIERS[0].1
    }

    fn evaluate(&self, answer: &AnswerContext<'_>) -> RuleOutcome {
        TIERS
            .iter()
            .find(|(min_words, _, _)| answer.word_count >= *min_words)
            .map(|&(_, points, remark)| RuleOutcome { points, remark })
            .unwrap_or(RuleOutcome {
                points: BRIEF_POINTS,
                remark: BRIEF_REMARK,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::features::FeatureFlags;

    fn outcome(word_count: usize) -> RuleOutcome {
        LengthRule::new().evaluate(&AnswerContext {
            text: "",
            topic: "placement",
            word_count,
            features: FeatureFlags::default(),
        })
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(outcome(200).points, 30);
        assert_eq!(outcome(199).points, 20);
        assert_eq!(outcome(100).points, 20);
        assert_eq!(outcome(99).points, 10);
        assert_eq!(outcome(1).points, 10);
    }

    #[test]
    fn test_remarks() {
        assert_eq!(outcome(450).remark, "Good length and detail");
        assert_eq!(
            outcome(150).remark,
            "Adequate length but could be more detailed"
        );
        assert_eq!(outcome(3).remark, "Answer is too brief - aim for 200+ words");
    }
}
