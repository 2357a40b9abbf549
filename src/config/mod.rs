//! Configuration loading for Rubric

mod schema;

pub use schema::{Config, ConfigOverride, KeywordConfig, DEFAULT_GRADER};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".rubricrc.json";

/// Load the config governing `work_dir`: the file given with `--config`
/// (relative to `work_dir`), else the nearest `.rubricrc.json` upward.
/// Without either, the defaults apply.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = match custom_path {
        Some(p) => {
            let path = work_dir.join(p);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path
        }
        None => match find_config_in_parents(work_dir) {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    tracing::debug!(path = %path.display(), "loading config");
    let mut chain = Vec::new();
    read_config_chain(&path, &mut chain)
}

/// Read one config file, then whatever it extends. `chain` holds the
/// canonical paths already read and ends up in `Config::sources`.
fn read_config_chain(config_path: &Path, chain: &mut Vec<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if chain.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    chain.push(canonical.clone());

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;
    config.sources = vec![canonical];

    if let Some(extends) = config.extends.take() {
        let base_path = extends_target(config_path, &extends);
        if !base_path.exists() {
            anyhow::bail!(
                "Extended config not found: {} (referenced from {})",
                base_path.display(),
                config_path.display()
            );
        }
        let base = read_config_chain(&base_path, chain)?;
        config.merge_from(base);
    }

    Ok(config)
}

/// Path an `extends` entry points at: relative to the referencing file,
/// `.json` assumed when no extension is given
fn extends_target(config_path: &Path, extends: &str) -> PathBuf {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let target = config_dir.join(extends);
    if target.extension().is_none() {
        target.with_extension("json")
    } else {
        target
    }
}

/// Search for .rubricrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Decides which files under a grading path hold submissions: the name ends
/// with a configured suffix, no ignore glob matches, and the file is not
/// one of the config files themselves.
#[derive(Debug, Clone)]
pub struct SubmissionFilter {
    ignore: GlobSet,
    suffixes: Vec<String>,
    config_files: Vec<PathBuf>,
}

impl SubmissionFilter {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.ignore {
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
            builder.add(glob);
        }
        let ignore = builder
            .build()
            .context("Failed to build ignore patterns")?;

        Ok(Self {
            ignore,
            suffixes: config
                .get_submission_patterns()
                .into_iter()
                .map(String::from)
                .collect(),
            config_files: config.sources.clone(),
        })
    }

    /// An ignore glob matches the path
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.is_match(path)
    }

    /// The path is a `.rubricrc.json` or a file reached through `extends`
    pub fn is_config_file(&self, path: &Path) -> bool {
        if path.file_name().and_then(|n| n.to_str()) == Some(CONFIG_FILENAME) {
            return true;
        }
        path.canonicalize()
            .map(|p| self.config_files.contains(&p))
            .unwrap_or(false)
    }

    /// A file found while walking a directory should be graded
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
            && !self.is_config_file(path)
            && !self.is_ignored(path)
    }
}

/// Default config written by `rubric init`
pub fn default_config_json(threshold: u8) -> String {
    format!(
        r#"{{
  "threshold": {},
  "grader": "{}",
  "ignore": [
    "**/archive/**",
    "**/*.draft.json"
  ],
  "submissionPatterns": [".json"],
  "keywords": {{
    "examples": ["example", "for instance", "such as", "consider"],
    "analysis": ["analysis", "compare", "trade-off", "advantage", "disadvantage"],
    "technicalTerms": ["design", "implementation", "optimization", "performance"]
  }},
  "overrides": []
}}
"#,
        threshold, DEFAULT_GRADER
    )
}
