//! Rubric: rule-based auto-grading for short-answer submissions
//!
//! This library scores free-text answers with a deterministic heuristic
//! analyzer and rolls per-question points up into a percentage and a letter
//! grade. Storage, rendering and authentication belong to the surrounding
//! application; the crate only consumes submission records and produces
//! grade records.

pub mod analyzer;
pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod reporter;
pub mod state;
pub mod submission;

pub use analyzer::{AnswerAnalyzer, GradeAggregator};
pub use error::{GradeError, Result};
pub use state::GradeState;
pub use submission::{Assignment, Submission, SubmissionStatus};

use serde::{Deserialize, Serialize};

/// Result of analyzing a single free-text answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAnalysis {
    /// Heuristic quality score (0-100)
    pub score: u8,
    /// Answer illustrates its points with examples
    pub has_examples: bool,
    /// Answer compares alternatives or weighs trade-offs
    pub has_analysis: bool,
    /// Answer uses domain terminology
    pub has_technical_terms: bool,
    /// Number of whitespace-separated words
    pub word_count: usize,
    /// One remark per criterion, in evaluation order
    pub feedback: Vec<String>,
    /// Points awarded per criterion, in the same order as `feedback`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<CriterionScore>,
}

impl QualityAnalysis {
    /// Analysis for a missing or blank answer
    pub fn no_answer() -> Self {
        Self {
            score: 0,
            has_examples: false,
            has_analysis: false,
            has_technical_terms: false,
            word_count: 0,
            feedback: vec![NO_ANSWER_REMARK.to_string()],
            breakdown: Vec::new(),
        }
    }

    /// Feedback remarks joined into a single line
    pub fn feedback_summary(&self) -> String {
        self.feedback.join("; ")
    }
}

/// Remark recorded for a blank answer
pub const NO_ANSWER_REMARK: &str = "No answer provided.";

/// Points one criterion contributed to a quality score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub points: u8,
    pub max_points: u8,
}

/// Scoring criteria, listed in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    Length,
    Terminology,
    Examples,
    Analysis,
    Structure,
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Length => write!(f, "length"),
            Criterion::Terminology => write!(f, "terminology"),
            Criterion::Examples => write!(f, "examples"),
            Criterion::Analysis => write!(f, "analysis"),
            Criterion::Structure => write!(f, "structure"),
        }
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Band a percentage. Percentages above 100 are possible when per-question
    /// maxima were rounded up, and still grade as A.
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Totals derived from per-question scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of per-question points
    pub total_score: u32,
    /// round(100 * total / assignment points)
    pub percentage: u32,
    pub letter_grade: Grade,
}

/// Finalized grade for one submission, handed to persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub submission_id: String,
    pub assignment_id: String,
    pub engineer_id: String,
    /// Point ceiling for each question
    pub question_max: u32,
    /// Assignment total point value
    pub max_points: u32,
    pub question_scores: Vec<u32>,
    pub question_feedback: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_feedback: Option<String>,
    pub total_score: u32,
    pub percentage: u32,
    pub letter_grade: Grade,
    pub graded_by: String,
    /// RFC 3339 timestamp
    pub graded_date: String,
}

/// Analyze one answer with the built-in rule table.
pub fn analyze(answer_text: &str, topic: &str) -> QualityAnalysis {
    AnswerAnalyzer::new().analyze(answer_text, topic)
}

/// Scale a 0-100 quality score to a question's point ceiling.
pub fn suggested_points(analysis: &QualityAnalysis, per_question_max: u32) -> u32 {
    GradeAggregator::suggested_points(analysis, per_question_max)
}

/// Sum per-question scores and derive percentage and letter grade.
pub fn recompute_totals(per_question_scores: &[u32], assignment_max_points: i64) -> Result<Totals> {
    GradeAggregator::recompute_totals(per_question_scores, assignment_max_points)
}
