//! JSON reporter for machine-readable output

use crate::analyzer::AggregateStats;
use crate::batch::{BatchFailure, BatchOutcome, SkippedSubmission};
use crate::{GradeRecord, QualityAnalysis};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single grade record as JSON
    pub fn report(&self, record: &GradeRecord) -> String {
        self.to_json(record, "{}")
    }

    /// Report a single answer analysis
    pub fn report_analysis(&self, analysis: &QualityAnalysis) -> String {
        self.to_json(analysis, "{}")
    }

    /// Report a batch with summary, skipped submissions and failures
    pub fn report_with_summary(&self, outcome: &BatchOutcome, stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: &outcome.records,
            summary: stats,
            skipped: &outcome.skipped,
            failures: &outcome.failures,
            not_started: outcome.not_started,
        };
        self.to_json(&output, "{}")
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [GradeRecord],
    summary: &'a AggregateStats,
    #[serde(skip_serializing_if = "is_empty")]
    skipped: &'a [SkippedSubmission],
    #[serde(skip_serializing_if = "is_empty")]
    failures: &'a [BatchFailure],
    #[serde(skip_serializing_if = "is_zero")]
    not_started: usize,
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}
