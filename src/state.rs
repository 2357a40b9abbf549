//! In-progress grade for one submission.
//!
//! A `GradeState` starts with every question at zero, is mutated through the
//! setters below, and is consumed by [`GradeState::finalize`], so a submitted
//! grade can no longer change. Every setter validates before writing; a
//! rejected call leaves the state exactly as it was.

use crate::analyzer::GradeAggregator;
use crate::error::{GradeError, Result};
use crate::{GradeRecord, QualityAnalysis, Submission, Totals};
use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeState {
    question_max: u32,
    max_points: NonZeroU32,
    scores: Vec<u32>,
    question_feedback: Vec<Option<String>>,
    overall_feedback: Option<String>,
    totals: Totals,
}

impl GradeState {
    /// Fresh state with every question at zero.
    pub fn new(question_count: usize, question_max: u32, assignment_max_points: i64) -> Result<Self> {
        let max_points = GradeAggregator::validate_points(assignment_max_points)?;
        if question_count == 0 {
            return Err(GradeError::InvalidAssignment(
                "assignment has no questions".to_string(),
            ));
        }
        let scores = vec![0; question_count];
        let totals = GradeAggregator::totals_for(&scores, max_points);
        Ok(Self {
            question_max,
            max_points,
            scores,
            question_feedback: vec![None; question_count],
            overall_feedback: None,
            totals,
        })
    }

    /// Fresh state sized and scaled from a submission's assignment
    pub fn for_submission(submission: &Submission) -> Result<Self> {
        let count = submission.question_count();
        let question_max = GradeAggregator::per_question_max(submission.assignment.points, count)?;
        Self::new(count, question_max, submission.assignment.points)
    }

    pub fn question_count(&self) -> usize {
        self.scores.len()
    }

    pub fn question_max(&self) -> u32 {
        self.question_max
    }

    pub fn max_points(&self) -> u32 {
        self.max_points.get()
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn question_feedback(&self, index: usize) -> Option<&str> {
        self.question_feedback.get(index).and_then(|f| f.as_deref())
    }

    pub fn overall_feedback(&self) -> Option<&str> {
        self.overall_feedback.as_deref()
    }

    /// Current totals, kept in step with every score change
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Store a score for one question, clamped to `[0, question_max]`.
    /// Returns the value actually stored.
    pub fn set_question_score(&mut self, index: usize, value: i64) -> Result<u32> {
        self.check_index(index)?;
        let clamped = value.clamp(0, self.question_max as i64) as u32;
        self.scores[index] = clamped;
        self.recompute_totals();
        debug!(index, requested = value, stored = clamped, "question score set");
        Ok(clamped)
    }

    /// Store the points suggested by an analysis, along with its remarks
    /// as the question's feedback.
    pub fn apply_suggestion(&mut self, index: usize, analysis: &QualityAnalysis) -> Result<u32> {
        self.check_index(index)?;
        let points = GradeAggregator::suggested_points(analysis, self.question_max);
        let stored = self.set_question_score(index, points as i64)?;
        self.question_feedback[index] = Some(analysis.feedback_summary());
        Ok(stored)
    }

    /// Set or clear (with a blank string) the feedback for one question
    pub fn set_question_feedback(&mut self, index: usize, feedback: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.question_feedback[index] = non_blank(feedback.into());
        Ok(())
    }

    /// Set or clear (with a blank string) the overall feedback
    pub fn set_overall_feedback(&mut self, feedback: impl Into<String>) {
        self.overall_feedback = non_blank(feedback.into());
    }

    /// Zero every score and clear every per-question remark. Overall
    /// feedback is kept.
    pub fn reset_all_scores(&mut self) {
        self.scores.iter_mut().for_each(|s| *s = 0);
        self.question_feedback.iter_mut().for_each(|f| *f = None);
        self.recompute_totals();
    }

    /// Re-derive total, percentage and letter grade from the stored scores
    pub fn recompute_totals(&mut self) -> Totals {
        self.totals = GradeAggregator::totals_for(&self.scores, self.max_points);
        self.totals
    }

    /// Freeze the grade into a record for persistence.
    pub fn finalize(
        self,
        submission: &Submission,
        graded_by: &str,
        graded_at: DateTime<Utc>,
    ) -> GradeRecord {
        let totals = GradeAggregator::totals_for(&self.scores, self.max_points);
        GradeRecord {
            submission_id: submission.id.clone(),
            assignment_id: submission.assignment_id().to_string(),
            engineer_id: submission.engineer_id.clone(),
            question_max: self.question_max,
            max_points: self.max_points.get(),
            question_scores: self.scores,
            question_feedback: self.question_feedback,
            overall_feedback: self.overall_feedback,
            total_score: totals.total_score,
            percentage: totals.percentage,
            letter_grade: totals.letter_grade,
            graded_by: graded_by.to_string(),
            graded_date: graded_at.to_rfc3339(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.scores.len() {
            Ok(())
        } else {
            Err(GradeError::OutOfRange {
                index,
                count: self.scores.len(),
            })
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
