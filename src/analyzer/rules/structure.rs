//! Answer structure, approximated by the number of '.'-delimited segments.

use super::{AnalysisRule, AnswerContext, RuleOutcome};
use crate::Criterion;

/// More segments than this counts as well structured
const MIN_SEGMENTS_EXCLUSIVE: usize = 5;

/// Rule scoring answer structure
pub struct StructureRule;

impl StructureRule {
    pub fn new() -> Self {
        Self
    }

    /// Number of '.'-delimited segments, empty segments included
    pub fn sentence_count(text: &str) -> usize {
        text.split('.').count()
    }
}

impl Default for StructureRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRule for StructureRule {
    fn criterion(&self) -> Criterion {
        Criterion::Structure
    }

    fn max_points(&self) -> u8 {
        20
    }

    fn evaluate(&self, answer: &AnswerContext<'_>) -> RuleOutcome {
        if Self::sentence_count(answer.text) > MIN_SEGMENTS_EXCLUSIVE {
            RuleOutcome {
                points: 20,
                remark: "Well-structured response",
            }
        } else {
            RuleOutcome {
                points: 10,
                remark: "Improve structure with more detailed explanations",
            }
        }
    }
}
