//! Console reporter with colored output

use crate::analyzer::{AggregateStats, GradeAggregator};
use crate::{Grade, GradeRecord, QualityAnalysis, NO_ANSWER_REMARK};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single grade
    pub fn report(&self, record: &GradeRecord) {
        print!("{}", self.render(record));
    }

    /// Report multiple grades with summary
    pub fn report_many(&self, records: &[GradeRecord], stats: &AggregateStats) {
        for record in records {
            self.report(record);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (just percentage and grade)
    pub fn report_quiet(&self, record: &GradeRecord) {
        println!("{}", self.render_quiet(record));
    }

    /// Report a single answer analysis
    pub fn report_analysis(&self, analysis: &QualityAnalysis, topic: &str) {
        print!("{}", self.render_analysis(analysis, topic));
    }

    pub fn render_quiet(&self, record: &GradeRecord) -> String {
        format!(
            "{}: {}% ({})",
            record.submission_id,
            record.percentage,
            self.colorize_grade(&record.letter_grade)
        )
    }

    pub fn render(&self, record: &GradeRecord) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            self.bold(&format!("📝 Grade: {}", record.submission_id))
        ));
        out.push_str(&format!(
            "   Assignment: {} | Engineer: {} | Questions: {}\n",
            record.assignment_id,
            record.engineer_id,
            record.question_scores.len()
        ));
        out.push_str(&format!(
            "   Graded by {} at {}\n\n",
            record.graded_by, record.graded_date
        ));

        out.push_str(&format!(
            "   Score: {} {}\n",
            self.create_score_bar(record.percentage),
            self.bold_grade(&record.letter_grade)
        ));
        out.push_str(&format!(
            "   {} / {} points\n",
            record.total_score, record.max_points
        ));
        out.push_str(&format!(
            "   {}\n\n",
            self.dim(GradeAggregator::grade_description(record.letter_grade))
        ));

        out.push_str(&format!("   {}\n", self.bold("Per-question scores:")));
        for (i, score) in record.question_scores.iter().enumerate() {
            let bar = self.create_mini_bar(*score, record.question_max);
            let score_str = format!("{:>3}/{}", score, record.question_max);
            out.push_str(&format!(
                "   Q{:<3} {} {}\n",
                i + 1,
                bar,
                self.color_by_ratio(&score_str, *score, record.question_max)
            ));
            if let Some(Some(feedback)) = record.question_feedback.get(i) {
                // Blank answers always show; other feedback only in verbose mode
                if self.verbose || feedback == NO_ANSWER_REMARK {
                    out.push_str(&format!("         {} {}\n", self.dim("→"), feedback));
                }
            }
        }

        if let Some(ref overall) = record.overall_feedback {
            out.push_str(&format!("\n   {} {}\n", self.bold("Feedback:"), overall));
        }
        out.push('\n');
        out
    }

    pub fn render_analysis(&self, analysis: &QualityAnalysis, topic: &str) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            self.bold(&format!("🔍 Answer analysis ({})", topic))
        ));
        out.push_str(&format!(
            "   Quality: {}\n",
            self.create_score_bar(u32::from(analysis.score))
        ));
        out.push_str(&format!("   Words: {}\n", analysis.word_count));
        out.push_str(&format!(
            "   Examples: {}  Analysis: {}  Terminology: {}\n\n",
            self.check_mark(analysis.has_examples),
            self.check_mark(analysis.has_analysis),
            self.check_mark(analysis.has_technical_terms)
        ));

        if self.verbose && !analysis.breakdown.is_empty() {
            out.push_str(&format!("   {}\n", self.bold("Breakdown:")));
            for entry in &analysis.breakdown {
                let points = format!("{:>2}/{}", entry.points, entry.max_points);
                out.push_str(&format!(
                    "   {:<12} {}\n",
                    entry.criterion.to_string(),
                    self.color_by_ratio(
                        &points,
                        u32::from(entry.points),
                        u32::from(entry.max_points)
                    )
                ));
            }
            out.push('\n');
        }

        out.push_str(&format!("   {}\n", self.bold("Feedback:")));
        for remark in &analysis.feedback {
            out.push_str(&format!("   {} {}\n", self.dim("→"), remark));
        }
        out.push('\n');
        out
    }

    fn check_mark(&self, present: bool) -> String {
        match (present, self.use_colors) {
            (true, true) => "yes".green().to_string(),
            (false, true) => "no".red().to_string(),
            (true, false) => "yes".to_string(),
            (false, false) => "no".to_string(),
        }
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!("{}\n", "═".repeat(60)));
        out.push_str(&format!("{}\n", self.bold("Summary")));
        out.push_str(&format!("{}\n", "═".repeat(60)));
        out.push_str(&format!(
            "   Submissions graded: {}\n",
            self.bold(&stats.submissions_graded.to_string())
        ));
        out.push_str(&format!(
            "   Average:            {}% ({})\n",
            self.bold(&stats.average_percentage.to_string()),
            self.colorize_grade(&stats.average_grade)
        ));
        let distribution = stats
            .grade_counts
            .iter()
            .map(|c| format!("{}: {}", c.grade, c.count))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&format!("   Distribution:       {}\n\n", distribution));
        out
    }

    fn colorize_grade(&self, grade: &Grade) -> String {
        let s = grade.to_string();
        if !self.use_colors {
            return s;
        }
        match grade {
            Grade::A => s.green().bold().to_string(),
            Grade::B => s.green().to_string(),
            Grade::C => s.yellow().to_string(),
            Grade::D => s.red().to_string(),
            Grade::F => s.red().bold().to_string(),
        }
    }

    fn bold_grade(&self, grade: &Grade) -> String {
        if self.use_colors {
            self.colorize_grade(grade).bold().to_string()
        } else {
            grade.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn color_by_ratio(&self, s: &str, value: u32, max: u32) -> String {
        if !self.use_colors || max == 0 {
            return s.to_string();
        }
        let pct = u64::from(value) * 100 / u64::from(max);
        if pct >= 80 {
            s.green().to_string()
        } else if pct >= 60 {
            s.yellow().to_string()
        } else {
            s.red().to_string()
        }
    }

    fn create_score_bar(&self, percentage: u32) -> String {
        let filled = (percentage.min(100) as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>3}%",
            "█".repeat(filled),
            "░".repeat(empty),
            percentage
        );

        if self.use_colors {
            if percentage >= 80 {
                bar.green().to_string()
            } else if percentage >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, value: u32, max: u32) -> String {
        let filled = if max == 0 {
            0
        } else {
            (value.min(max) as usize * 10) / max as usize
        };
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
