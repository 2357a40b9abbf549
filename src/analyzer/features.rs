//! Keyword feature detection.
//!
//! Features are kept as an ordered table of `(feature, matcher)` pairs so the
//! keyword lists can change without touching the scoring rules.

use crate::config::KeywordConfig;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Content features detected in an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Examples,
    Analysis,
    TechnicalTerms,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Examples, Feature::Analysis, Feature::TechnicalTerms];

    /// Built-in keyword list for this feature
    pub fn default_keywords(self) -> &'static [&'static str] {
        match self {
            Feature::Examples => &["example", "for instance", "such as", "consider"],
            Feature::Analysis => &[
                "analysis",
                "compare",
                "trade-off",
                "advantage",
                "disadvantage",
            ],
            Feature::TechnicalTerms => &["design", "implementation", "optimization", "performance"],
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feature::Examples => write!(f, "examples"),
            Feature::Analysis => write!(f, "analysis"),
            Feature::TechnicalTerms => write!(f, "technical-terms"),
        }
    }
}

/// Predicate deciding whether an answer exhibits a feature
pub trait FeatureMatcher: Send + Sync {
    fn matches(&self, text: &str) -> bool;
}

/// Case-insensitive substring match against any of a list of keywords
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    /// Build a matcher. Blank keywords are dropped; with no keywords left the
    /// matcher never matches.
    pub fn new<I, S>(keywords: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.trim().is_empty())
            .collect();

        let pattern = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self { keywords, pattern })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl FeatureMatcher for KeywordMatcher {
    fn matches(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|p| p.is_match(text))
            .unwrap_or(false)
    }
}

/// Which features an answer exhibits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    pub examples: bool,
    pub analysis: bool,
    pub technical_terms: bool,
}

impl FeatureFlags {
    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Examples => self.examples,
            Feature::Analysis => self.analysis,
            Feature::TechnicalTerms => self.technical_terms,
        }
    }

    fn set(&mut self, feature: Feature) {
        match feature {
            Feature::Examples => self.examples = true,
            Feature::Analysis => self.analysis = true,
            Feature::TechnicalTerms => self.technical_terms = true,
        }
    }
}

/// Ordered table of feature matchers
#[derive(Clone)]
pub struct FeatureSet {
    entries: Vec<(Feature, Arc<dyn FeatureMatcher>)>,
}

impl FeatureSet {
    /// A table with no matchers; every feature reads as absent
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Built-in keyword table, with any lists from config replacing the defaults
    pub fn from_config(keywords: &KeywordConfig) -> Result<Self, regex::Error> {
        let mut set = Self::default();
        for feature in Feature::ALL {
            if let Some(list) = keywords.for_feature(feature) {
                set.insert(feature, KeywordMatcher::new(list.iter().cloned())?);
            }
        }
        Ok(set)
    }

    /// Register a matcher. An existing entry for the same feature is replaced
    /// in place so evaluation order is kept.
    pub fn insert<M: FeatureMatcher + 'static>(&mut self, feature: Feature, matcher: M) {
        let matcher: Arc<dyn FeatureMatcher> = Arc::new(matcher);
        match self.entries.iter_mut().find(|(f, _)| *f == feature) {
            Some(entry) => entry.1 = matcher,
            None => self.entries.push((feature, matcher)),
        }
    }

    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    /// Evaluate every matcher against the answer text
    pub fn detect(&self, text: &str) -> FeatureFlags {
        let mut flags = FeatureFlags::default();
        for (feature, matcher) in &self.entries {
            if matcher.matches(text) {
                flags.set(*feature);
            }
        }
        flags
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        let mut set = Self::empty();
        for feature in Feature::ALL {
            let matcher = KeywordMatcher::new(feature.default_keywords().iter().copied())
                .expect("built-in keyword lists are escaped literals");
            set.insert(feature, matcher);
        }
        set
    }
}

impl std::fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.features()).finish()
    }
}
