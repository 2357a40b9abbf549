//! Grade aggregation: point scaling, totals and letter grades

use crate::error::{GradeError, Result};
use crate::{Grade, GradeRecord, QualityAnalysis, Totals};
use serde::Serialize;
use std::num::NonZeroU32;

/// Converts quality scores into points and rolls up totals
pub struct GradeAggregator;

impl GradeAggregator {
    /// Point ceiling for one question: round(total points / question count).
    pub fn per_question_max(total_points: i64, question_count: usize) -> Result<u32> {
        let points = Self::validate_points(total_points)?;
        if question_count == 0 {
            return Err(GradeError::InvalidAssignment(
                "assignment has no questions".to_string(),
            ));
        }
        let max = round_div(points.get() as u64, question_count as u64);
        // max <= points, which already fits in u32
        Ok(max as u32)
    }

    /// Scale a 0-100 quality score to a question's point ceiling.
    pub fn suggested_points(analysis: &QualityAnalysis, per_question_max: u32) -> u32 {
        let scaled = round_div(analysis.score as u64 * per_question_max as u64, 100);
        scaled.min(per_question_max as u64) as u32
    }

    /// Sum per-question scores and derive percentage and letter grade.
    /// Fails with `InvalidAssignment` when the assignment is worth no points.
    pub fn recompute_totals(scores: &[u32], assignment_max_points: i64) -> Result<Totals> {
        let max_points = Self::validate_points(assignment_max_points)?;
        Ok(Self::totals_for(scores, max_points))
    }

    pub(crate) fn totals_for(scores: &[u32], max_points: NonZeroU32) -> Totals {
        let total: u64 = scores.iter().map(|&s| s as u64).sum();
        let percentage = round_div(total * 100, max_points.get() as u64);
        let percentage = u32::try_from(percentage).unwrap_or(u32::MAX);
        Totals {
            total_score: u32::try_from(total).unwrap_or(u32::MAX),
            percentage,
            letter_grade: Self::letter_grade(percentage),
        }
    }

    pub(crate) fn validate_points(points: i64) -> Result<NonZeroU32> {
        if points <= 0 {
            return Err(GradeError::InvalidAssignment(format!(
                "total points must be positive (got {})",
                points
            )));
        }
        u32::try_from(points)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                GradeError::InvalidAssignment(format!("total points too large ({})", points))
            })
    }

    /// Letter grade for a percentage, first matching threshold from the top
    pub fn letter_grade(percentage: u32) -> Grade {
        Grade::from_percentage(percentage)
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - thorough, well-supported answers",
            Grade::B => "Good - solid answers with room for more depth",
            Grade::C => "Fair - answers cover the basics but need more detail",
            Grade::D => "Poor - answers are thin or missing key reasoning",
            Grade::F => "Failing - most answers are missing or too brief",
        }
    }

    /// Summary across a batch of finalized grades
    pub fn aggregate_stats(records: &[GradeRecord]) -> AggregateStats {
        if records.is_empty() {
            return AggregateStats::default();
        }

        let total: u64 = records.iter().map(|r| r.percentage as u64).sum();
        let average = (total / records.len() as u64) as u32;

        let grade_counts = Grade::ALL
            .iter()
            .map(|&g| GradeCount {
                grade: g,
                count: records.iter().filter(|r| r.letter_grade == g).count(),
            })
            .collect();

        AggregateStats {
            submissions_graded: records.len(),
            average_percentage: average,
            average_grade: Grade::from_percentage(average),
            grade_counts,
        }
    }
}

/// Integer division rounding halves up. `den` must be non-zero.
fn round_div(num: u64, den: u64) -> u64 {
    (num * 2 + den) / (den * 2)
}

/// Aggregate statistics from a batch of grades
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of submissions graded
    pub submissions_graded: usize,
    /// Mean percentage (integer division)
    pub average_percentage: u32,
    pub average_grade: Grade,
    /// Count per letter grade, A through F
    pub grade_counts: Vec<GradeCount>,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            submissions_graded: 0,
            average_percentage: 0,
            average_grade: Grade::F,
            grade_counts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: usize,
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn suggested_points_within_question_max(score in 0u8..=100, max in 0u32..10_000) {
            let analysis = QualityAnalysis { score, ..QualityAnalysis::no_answer() };
            let points = GradeAggregator::suggested_points(&analysis, max);
            prop_assert!(points <= max);
        }

        #[test]
        fn recompute_totals_idempotent(
            scores in prop::collection::vec(0u32..50, 0..30),
            max_points in 1i64..2_000
        ) {
            let a = GradeAggregator::recompute_totals(&scores, max_points).unwrap();
            let b = GradeAggregator::recompute_totals(&scores, max_points).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.total_score, scores.iter().sum::<u32>());
            prop_assert_eq!(a.letter_grade, Grade::from_percentage(a.percentage));
        }
    }
}
