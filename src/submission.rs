//! Submission and assignment records, as handed over by the data store.

use crate::analyzer::GradeAggregator;
use crate::error::Result as GradeResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Review status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Waiting for a grade
    #[default]
    Submitted,
    Reviewed,
    Graded,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Reviewed => write!(f, "reviewed"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

/// Assignment the submission answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Topic label passed to the analyzer
    #[serde(default)]
    pub topic: String,
    /// Total point value; must be positive to be gradeable
    pub points: i64,
    /// Question texts, when the store provides them
    #[serde(default)]
    pub questions: Vec<String>,
}

/// A submitted set of answers. Read-only to the grader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    /// Defaults to the embedded assignment's id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    #[serde(default)]
    pub engineer_id: String,
    pub assignment: Assignment,
    /// One entry per question; `null`, blank or missing means no answer
    #[serde(default)]
    pub answers: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
}

impl Submission {
    pub fn assignment_id(&self) -> &str {
        self.assignment_id.as_deref().unwrap_or(&self.assignment.id)
    }

    /// Number of questions: the assignment's question list when present,
    /// otherwise one per supplied answer.
    pub fn question_count(&self) -> usize {
        if self.assignment.questions.is_empty() {
            self.answers.len()
        } else {
            self.assignment.questions.len()
        }
    }

    /// Answer text for a question; empty when there is none
    pub fn answer(&self, index: usize) -> &str {
        self.answers
            .get(index)
            .and_then(|a| a.as_deref())
            .unwrap_or("")
    }

    /// Answers supplied past the last question, which grading ignores
    pub fn surplus_answers(&self) -> usize {
        self.answers.len().saturating_sub(self.question_count())
    }

    pub fn per_question_max(&self) -> GradeResult<u32> {
        GradeAggregator::per_question_max(self.assignment.points, self.question_count())
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Submitted
    }
}

/// A submissions file holds one record or an array of them
#[derive(Deserialize)]
#[serde(untagged)]
enum SubmissionFile {
    Many(Vec<Submission>),
    One(Box<Submission>),
}

/// Parse submissions from JSON text
pub fn parse_submissions(content: &str) -> Result<Vec<Submission>> {
    let parsed: SubmissionFile =
        serde_json::from_str(content).context("Invalid submission JSON")?;
    Ok(match parsed {
        SubmissionFile::Many(list) => list,
        SubmissionFile::One(one) => vec![*one],
    })
}

/// Read submissions from a JSON file
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read submission file: {}", path.display()))?;
    parse_submissions(&content).with_context(|| format!("In {}", path.display()))
}
