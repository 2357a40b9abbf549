//! Rubric: Short-Answer Auto-Grading CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rubric::analyzer::{AnswerAnalyzer, GradeAggregator};
use rubric::batch::{BatchFailure, BatchGrader};
use rubric::config::{default_config_json, load_config, SubmissionFilter, CONFIG_FILENAME};
use rubric::reporter::{ConsoleReporter, JsonReporter};
use rubric::submission::load_submissions;
use rubric::Submission;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// Rubric: automatic grading for short-answer submissions
#[derive(Parser, Debug)]
#[command(name = "rubric")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Submission file or directory to grade (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum percentage threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .rubricrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name recorded as the grader (default: auto-grader)
    #[arg(long, value_name = "NAME")]
    grader: Option<String>,

    /// Grade submissions in parallel (default for more than 10 submissions)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a single answer read from a file or stdin
    Analyze {
        /// Topic label of the question
        #[arg(long)]
        topic: String,

        /// File holding the answer text (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file providing keyword lists
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create .rubricrc.json with sensible defaults
    Init {
        /// Minimum percentage threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    rubric::logging::init_cli_logger(args.verbose);

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Analyze {
                topic,
                file,
                json,
                config,
            } => run_analyze(&topic, file.as_deref(), json, config.as_deref()),
            Commands::Init { threshold, dir } => run_init(threshold, dir.as_deref()),
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a submission file or directory is required");
    };

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.grader.as_deref());

    let filter = SubmissionFilter::from_config(&config)?;
    let files = collect_submission_files(&path, &filter)?;

    if files.is_empty() {
        eprintln!("{}: No submission files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let (submissions, load_failures) = load_all(&files);

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let analyzer = AnswerAnalyzer::from_keywords(&config.keywords)
        .context("Invalid keyword list in config")?;
    let grader = BatchGrader::new(analyzer).with_grader(config.grader_name());

    let use_parallel = args.parallel || submissions.len() > 10;
    let outcome = if use_parallel {
        grader.grade_all_parallel(&submissions)
    } else {
        grader.grade_all(&submissions)
    };

    if !args.quiet && !args.json {
        for skipped in &outcome.skipped {
            eprintln!(
                "{}: Skipping {} ({})",
                "Info".blue(),
                skipped.submission_id,
                skipped.reason
            );
        }
    }
    for failure in load_failures.iter().chain(outcome.failures.iter()) {
        eprintln!(
            "{}: {}: {}",
            "Error".red(),
            failure.submission_id,
            failure.message
        );
    }
    let had_errors = !load_failures.is_empty() || !outcome.failures.is_empty();

    if outcome.records.is_empty() {
        eprintln!("{}: No submissions were graded", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let stats = GradeAggregator::aggregate_stats(&outcome.records);

    // Output results
    if args.json {
        let reporter = JsonReporter::new().pretty();
        if outcome.records.len() == 1 && outcome.skipped.is_empty() {
            println!("{}", reporter.report(&outcome.records[0]));
        } else {
            println!("{}", reporter.report_with_summary(&outcome, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for record in &outcome.records {
            reporter.report_quiet(record);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }

        if outcome.records.len() == 1 {
            reporter.report(&outcome.records[0]);
        } else {
            reporter.report_many(&outcome.records, &stats);
        }
    }

    // Errors outrank a missed threshold
    if had_errors {
        return Ok(ExitCode::from(2));
    }

    // Check threshold (per-file override applies when grading one file)
    let threshold = match files.as_slice() {
        [only] => config.threshold_for_file(only),
        _ => config.threshold,
    };
    if let Some(threshold) = threshold {
        let percentage = if outcome.records.len() == 1 {
            outcome.records[0].percentage
        } else {
            stats.average_percentage
        };

        if percentage < u32::from(threshold) {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Percentage {}% is below threshold {}%",
                    "Failed".red().bold(),
                    percentage,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_analyze(
    topic: &str,
    file: Option<&Path>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read answer: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read answer from stdin")?;
            buf
        }
    };

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, config_path)?;
    let analyzer = AnswerAnalyzer::from_keywords(&config.keywords)
        .context("Invalid keyword list in config")?;
    let analysis = analyzer.analyze(&text, topic);

    if json {
        println!("{}", JsonReporter::new().pretty().report_analysis(&analysis));
    } else {
        ConsoleReporter::new().verbose().report_analysis(&analysis, topic);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);

    std::fs::write(&config_path, default_config_json(threshold_value)).with_context(|| {
        format!("Failed to write config to {}", config_path.display())
    })?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

/// Load every file, keeping submissions in file order. Unreadable files
/// become failures keyed by path.
fn load_all(files: &[PathBuf]) -> (Vec<Submission>, Vec<BatchFailure>) {
    let mut submissions = Vec::new();
    let mut failures = Vec::new();
    for file in files {
        match load_submissions(file) {
            Ok(mut loaded) => submissions.append(&mut loaded),
            Err(e) => failures.push(BatchFailure {
                submission_id: file.display().to_string(),
                message: format!("{:#}", e),
            }),
        }
    }
    (submissions, failures)
}

fn collect_submission_files(path: &Path, filter: &SubmissionFilter) -> Result<Vec<PathBuf>> {
    // A file named on the command line is graded unless an ignore glob says otherwise
    if path.is_file() {
        if filter.is_ignored(path) {
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && filter.accepts(e.path()))
        .map(|e| e.into_path())
        .collect();

    // Sort for consistent output
    files.sort();

    Ok(files)
}
