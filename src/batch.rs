//! Batch auto-grading.
//!
//! Each submission is graded independently: one analyzer call per question,
//! one `GradeState` owned by the closure grading that submission. Batches can
//! run on the rayon pool and be cancelled between submissions.

use crate::analyzer::AnswerAnalyzer;
use crate::config::DEFAULT_GRADER;
use crate::error::Result;
use crate::{GradeRecord, GradeState, Submission};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// A submission left ungraded on purpose
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSubmission {
    pub submission_id: String,
    pub reason: String,
}

/// A submission that could not be graded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub submission_id: String,
    pub message: String,
}

/// Everything a batch run produced, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub records: Vec<GradeRecord>,
    pub skipped: Vec<SkippedSubmission>,
    pub failures: Vec<BatchFailure>,
    /// Submissions never started because the batch was cancelled
    pub not_started: usize,
}

impl BatchOutcome {
    pub fn was_cancelled(&self) -> bool {
        self.not_started > 0
    }
}

enum Graded {
    Record(Box<GradeRecord>),
    Skipped(SkippedSubmission),
    Failed(BatchFailure),
    NotStarted,
}

/// Auto-grades submissions with an analyzer
pub struct BatchGrader {
    analyzer: AnswerAnalyzer,
    grader: String,
    graded_at: Option<DateTime<Utc>>,
    cancel: Arc<AtomicBool>,
}

impl BatchGrader {
    pub fn new(analyzer: AnswerAnalyzer) -> Self {
        Self {
            analyzer,
            grader: DEFAULT_GRADER.to_string(),
            graded_at: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Name recorded as `gradedBy`
    pub fn with_grader(mut self, grader: impl Into<String>) -> Self {
        self.grader = grader.into();
        self
    }

    /// Stamp every record with a fixed time instead of the current time
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.graded_at = Some(at);
        self
    }

    /// Share a cancellation flag with the caller
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Flag that stops the batch before the next submission starts
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Auto-grade one submission: analyze every answer and store the
    /// suggested points.
    pub fn grade_submission(&self, submission: &Submission) -> Result<GradeRecord> {
        let mut state = GradeState::for_submission(submission)?;
        let topic = submission.assignment.topic.as_str();

        if submission.surplus_answers() > 0 {
            warn!(
                submission = %submission.id,
                surplus = submission.surplus_answers(),
                "ignoring answers past the last question"
            );
        }

        for index in 0..state.question_count() {
            let analysis = self.analyzer.analyze(submission.answer(index), topic);
            state.apply_suggestion(index, &analysis)?;
        }

        let at = self.graded_at.unwrap_or_else(Utc::now);
        let record = state.finalize(submission, &self.grader, at);
        info!(
            submission = %record.submission_id,
            total = record.total_score,
            percentage = record.percentage,
            grade = %record.letter_grade,
            "submission graded"
        );
        Ok(record)
    }

    /// Grade submissions one after another
    pub fn grade_all(&self, submissions: &[Submission]) -> BatchOutcome {
        let graded: Vec<Graded> = submissions.iter().map(|s| self.grade_one(s)).collect();
        collect_outcome(graded)
    }

    /// Grade submissions on the rayon pool. Output order matches input order.
    pub fn grade_all_parallel(&self, submissions: &[Submission]) -> BatchOutcome {
        let graded: Vec<Graded> = submissions.par_iter().map(|s| self.grade_one(s)).collect();
        collect_outcome(graded)
    }

    fn grade_one(&self, submission: &Submission) -> Graded {
        if self.cancel.load(Ordering::Relaxed) {
            return Graded::NotStarted;
        }
        if !submission.is_pending() {
            info!(submission = %submission.id, status = %submission.status, "skipping");
            return Graded::Skipped(SkippedSubmission {
                submission_id: submission.id.clone(),
                reason: format!("status is {}", submission.status),
            });
        }
        match self.grade_submission(submission) {
            Ok(record) => Graded::Record(Box::new(record)),
            Err(e) => {
                warn!(submission = %submission.id, error = %e, "grading failed");
                Graded::Failed(BatchFailure {
                    submission_id: submission.id.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}

fn collect_outcome(graded: Vec<Graded>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for g in graded {
        match g {
            Graded::Record(r) => outcome.records.push(*r),
            Graded::Skipped(s) => outcome.skipped.push(s),
            Graded::Failed(f) => outcome.failures.push(f),
            Graded::NotStarted => outcome.not_started += 1,
        }
    }
    outcome
}
