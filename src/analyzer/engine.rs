//! Answer analyzer - runs the rule table over one answer

use crate::config::KeywordConfig;
use crate::{CriterionScore, QualityAnalysis};
use tracing::debug;

use super::features::{FeatureFlags, FeatureSet};
use super::rules::{default_rules, AnalysisRule, AnswerContext};

/// Scores can never exceed this, whatever the rule table sums to
const MAX_SCORE: u32 = 100;

/// Deterministic, rule-based answer analyzer. Holds no mutable state, so one
/// instance can be shared across threads.
pub struct AnswerAnalyzer {
    features: FeatureSet,
    rules: Vec<Box<dyn AnalysisRule>>,
}

impl AnswerAnalyzer {
    /// Analyzer with the built-in keyword table and rules
    pub fn new() -> Self {
        Self {
            features: FeatureSet::default(),
            rules: default_rules(),
        }
    }

    /// Analyzer whose keyword lists come from config
    pub fn from_keywords(keywords: &KeywordConfig) -> Result<Self, regex::Error> {
        Ok(Self::new().with_features(FeatureSet::from_config(keywords)?))
    }

    /// Replace the feature table
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// Replace the rule list (evaluated in the given order)
    pub fn with_rules(mut self, rules: Vec<Box<dyn AnalysisRule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Analyze one answer. Never fails: any text, blank or malformed, yields
    /// a valid analysis.
    pub fn analyze(&self, answer_text: &str, topic: &str) -> QualityAnalysis {
        if answer_text.trim().is_empty() {
            debug!(topic, "blank answer");
            return QualityAnalysis::no_answer();
        }

        let word_count = answer_text.split_whitespace().count();
        let features = self.features.detect(answer_text);
        let context = AnswerContext {
            text: answer_text,
            topic,
            word_count,
            features,
        };

        let mut total: u32 = 0;
        let mut feedback = Vec::with_capacity(self.rules.len());
        let mut breakdown = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let outcome = rule.evaluate(&context);
            total += outcome.points as u32;
            feedback.push(outcome.remark.to_string());
            breakdown.push(CriterionScore {
                criterion: rule.criterion(),
                points: outcome.points,
                max_points: rule.max_points(),
            });
        }

        let score = total.min(MAX_SCORE) as u8;
        debug!(topic, word_count, score, "answer analyzed");

        let FeatureFlags {
            examples,
            analysis,
            technical_terms,
        } = features;

        QualityAnalysis {
            score,
            has_examples: examples,
            has_analysis: analysis,
            has_technical_terms: technical_terms,
            word_count,
            feedback,
            breakdown,
        }
    }
}

impl Default for AnswerAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::RuleOutcome;
    use crate::{Criterion, NO_ANSWER_REMARK};

    /// Build an answer with an exact word count and sentence layout.
    fn answer_with(words: usize, periods: usize, extra: &str) -> String {
        let extra_words = extra.split_whitespace().count();
        let filler = words - extra_words;
        let mut parts: Vec<String> = (0..filler).map(|i| format!("word{}", i)).collect();
        // Put the periods on the last `periods` filler words so the segment
        // count is periods + 1.
        for i in 0..periods {
            let idx = filler - 1 - i;
            parts[idx].push('.');
        }
        let mut text = extra.to_string();
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&parts.join(" "));
        text
    }

    #[test]
    fn test_empty_answer() {
        let a = AnswerAnalyzer::new().analyze("", "floorplanning");
        assert_eq!(a.score, 0);
        assert_eq!(a.feedback, vec![NO_ANSWER_REMARK.to_string()]);
        assert_eq!(a.word_count, 0);
        assert!(!a.has_examples && !a.has_analysis && !a.has_technical_terms);
        assert!(a.breakdown.is_empty());
    }

    #[test]
    fn test_whitespace_only_answer() {
        let a = AnswerAnalyzer::new().analyze(" \n\t  ", "power");
        assert_eq!(a, QualityAnalysis::no_answer());
    }

    #[test]
    fn test_full_marks_answer_scores_ninety() {
        let text = answer_with(
            220,
            6,
            "For example the trade-off between performance and area",
        );
        assert_eq!(text.split_whitespace().count(), 220);

        let a = AnswerAnalyzer::new().analyze(&text, "placement");
        assert_eq!(a.word_count, 220);
        assert!(a.has_examples);
        assert!(a.has_analysis);
        assert!(a.has_technical_terms);
        assert_eq!(a.score, 90);
        assert_eq!(
            a.feedback,
            vec![
                "Good length and detail",
                "Good use of technical terminology",
                "Good use of examples",
                "Shows analytical thinking",
                "Well-structured response",
            ]
        );
    }

    #[test]
    fn test_brief_answer_without_keywords_scores_twenty() {
        let text = answer_with(50, 2, "");
        let a = AnswerAnalyzer::new().analyze(&text, "routing");
        assert_eq!(a.word_count, 50);
        assert_eq!(a.score, 20);
        assert_eq!(
            a.feedback,
            vec![
                "Answer is too brief - aim for 200+ words",
                "Include more technical concepts and terminology",
                "Add specific examples to strengthen your answer",
                "Include more analysis and trade-off considerations",
                "Improve structure with more detailed explanations",
            ]
        );
    }

    #[test]
    fn test_breakdown_matches_feedback_order() {
        let a = AnswerAnalyzer::new().analyze("A design. Consider it.", "cts");
        let criteria: Vec<Criterion> = a.breakdown.iter().map(|c| c.criterion).collect();
        assert_eq!(
            criteria,
            vec![
                Criterion::Length,
                Criterion::Terminology,
                Criterion::Examples,
                Criterion::Analysis,
                Criterion::Structure,
            ]
        );
        let sum: u32 = a.breakdown.iter().map(|c| c.points as u32).sum();
        assert_eq!(sum, a.score as u32);
        // length 10 + terminology 15 + examples 15 + analysis 0 + structure 10
        assert_eq!(a.score, 50);
    }

    #[test]
    fn test_topic_does_not_affect_score() {
        let analyzer = AnswerAnalyzer::new();
        let text = "Compare both designs. One is faster.";
        assert_eq!(
            analyzer.analyze(text, "power"),
            analyzer.analyze(text, "timing")
        );
    }

    struct Generous;

    impl AnalysisRule for Generous {
        fn criterion(&self) -> Criterion {
            Criterion::Length
        }
        fn max_points(&self) -> u8 {
            80
        }
        fn evaluate(&self, _answer: &AnswerContext<'_>) -> RuleOutcome {
            RuleOutcome {
                points: 80,
                remark: "generous",
            }
        }
    }

    #[test]
    fn test_score_is_clamped_to_one_hundred() {
        let rules: Vec<Box<dyn AnalysisRule>> = vec![Box::new(Generous), Box::new(Generous)];
        let analyzer = AnswerAnalyzer::new().with_rules(rules);
        let a = analyzer.analyze("anything", "x");
        assert_eq!(a.score, 100);
        assert_eq!(a.feedback.len(), 2);
    }

    #[test]
    fn test_keyword_overrides_change_detection() {
        let keywords = KeywordConfig {
            examples: Some(vec!["e.g.".to_string()]),
            ..KeywordConfig::default()
        };
        let analyzer = AnswerAnalyzer::from_keywords(&keywords).unwrap();
        assert!(analyzer.analyze("e.g. a buffer", "cts").has_examples);
        assert!(!analyzer.analyze("for example a buffer", "cts").has_examples);
    }
}
