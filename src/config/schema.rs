//! Config schema and deserialization

use crate::analyzer::Feature;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Replacement keyword lists, one per feature. `None` keeps the built-in list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordConfig {
    #[serde(default)]
    pub examples: Option<Vec<String>>,
    #[serde(default)]
    pub analysis: Option<Vec<String>>,
    #[serde(default)]
    pub technical_terms: Option<Vec<String>>,
}

impl KeywordConfig {
    pub fn for_feature(&self, feature: Feature) -> Option<&[String]> {
        match feature {
            Feature::Examples => self.examples.as_deref(),
            Feature::Analysis => self.analysis.as_deref(),
            Feature::TechnicalTerms => self.technical_terms.as_deref(),
        }
    }

    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    /// Fill lists this config leaves unset from `base`
    fn merge_from(&mut self, base: KeywordConfig) {
        if self.examples.is_none() {
            self.examples = base.examples;
        }
        if self.analysis.is_none() {
            self.analysis = base.analysis;
        }
        if self.technical_terms.is_none() {
            self.technical_terms = base.technical_terms;
        }
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional threshold override for matched files
    #[serde(default)]
    pub threshold: Option<u8>,
}

/// Root config structure for .rubricrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum percentage (exit 1 if below)
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Glob patterns for files/directories to exclude
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Suffixes identifying submission files (default: .json)
    #[serde(default)]
    pub submission_patterns: Vec<String>,

    /// Name recorded as `gradedBy` on auto-generated grades
    #[serde(default)]
    pub grader: Option<String>,

    /// Keyword list overrides for feature detection
    #[serde(default)]
    pub keywords: KeywordConfig,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,

    /// Canonical paths of every file this config was read from, `extends`
    /// chain included
    #[serde(skip)]
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>, cli_grader: Option<&str>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if let Some(grader) = cli_grader {
            self.grader = Some(grader.to_string());
        }
        self
    }

    /// Threshold for a specific submission file, applying overrides in order
    pub fn threshold_for_file(&self, file_path: &Path) -> Option<u8> {
        let mut threshold = self.threshold;
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(t) = override_cfg.threshold {
                    threshold = Some(t);
                }
            }
        }
        threshold
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(file_path))
                .unwrap_or(false)
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.grader.is_none() {
            self.grader = base.grader;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.submission_patterns.is_empty() {
            self.submission_patterns = base.submission_patterns;
        }

        self.keywords.merge_from(base.keywords);

        // Base overrides first so this config's overrides win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;

        self.sources.extend(base.sources);
    }

    /// Submission file suffixes, defaulting to `.json`
    pub fn get_submission_patterns(&self) -> Vec<&str> {
        if self.submission_patterns.is_empty() {
            vec![".json"]
        } else {
            self.submission_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Grader name for auto-generated grades
    pub fn grader_name(&self) -> &str {
        self.grader.as_deref().unwrap_or(DEFAULT_GRADER)
    }
}

pub const DEFAULT_GRADER: &str = "auto-grader";
