//! Error taxonomy for grade aggregation

use thiserror::Error;

/// Errors surfaced by grade aggregation. Answer analysis never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// The assignment cannot produce a percentage (non-positive points, no questions)
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// A question index outside the submission's question count
    #[error("Question index {index} is out of range (submission has {count} questions)")]
    OutOfRange { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, GradeError>;
