//! All-or-nothing rules keyed on a detected feature (terminology, examples, analysis).

use super::{AnalysisRule, AnswerContext, RuleOutcome};
use crate::analyzer::features::Feature;
use crate::Criterion;

/// Awards full points when the answer exhibits a feature, none otherwise
pub struct FeaturePresenceRule {
    criterion: Criterion,
    feature: Feature,
    points: u8,
    present: &'static str,
    missing: &'static str,
}

impl FeaturePresenceRule {
    pub fn terminology() -> Self {
        Self {
            criterion: Criterion::Terminology,
            feature: Feature::TechnicalTerms,
            points: 15,
            present: "Good use of technical terminology",
            missing: "Include more technical concepts and terminology",
        }
    }

    pub fn examples() -> Self {
        Self {
            criterion: Criterion::Examples,
            feature: Feature::Examples,
            points: 15,
            present: "Good use of examples",
            missing: "Add specific examples to strengthen your answer",
        }
    }

    pub fn analysis() -> Self {
        Self {
            criterion: Criterion::Analysis,
            feature: Feature::Analysis,
            points: 10,
            present: "Shows analytical thinking",
            missing: "Include more analysis and trade-off considerations",
        }
    }
}

impl AnalysisRule for FeaturePresenceRule {
    fn criterion(&self) -> Criterion {
        self.criterion
    }

    fn max_points(&self) -> u8 {
        self.points
    }

    fn evaluate(&self, answer: &AnswerContext<'_>) -> RuleOutcome {
        if answer.features.has(self.feature) {
            RuleOutcome {
                points: self.points,
                remark: self.present,
            }
        } else {
            RuleOutcome {
                points: 0,
                remark: self.missing,
            }
        }
    }
}
