//! Case-insensitive substring matching of many keywords at once.

use regex::RegexSet;

use super::KeywordSet;
use crate::error::{Error, Result};

/// Keyword count from which [`MatchStrategy::Auto`] uses a multi-pattern set.
pub const MULTI_PATTERN_THRESHOLD: usize = 32;

/// How keyword presence is computed. All strategies give identical results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// One substring scan per keyword
    Linear,
    /// A single pass with a compiled set of literal patterns
    MultiPattern,
    /// `MultiPattern` for large keyword sets, `Linear` otherwise
    #[default]
    Auto,
}

#[derive(Debug, Clone)]
enum Engine {
    Linear(Vec<String>),
    MultiPattern(RegexSet),
}

/// Compiled matcher for a keyword set.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    engine: Engine,
}

impl KeywordMatcher {
    /// Build a matcher with an explicit strategy.
    pub fn new(keywords: &KeywordSet, strategy: MatchStrategy) -> Result<Self> {
        let needles: Vec<String> = keywords.iter().map(str::to_lowercase).collect();
        let multi = match strategy {
            MatchStrategy::Linear => false,
            MatchStrategy::MultiPattern => true,
            MatchStrategy::Auto => needles.len() >= MULTI_PATTERN_THRESHOLD,
        };

        let engine = if multi {
            let set = RegexSet::new(needles.iter().map(|needle| regex::escape(needle)))
                .map_err(|e| Error::Keyword(e.to_string()))?;
            Engine::MultiPattern(set)
        } else {
            Engine::Linear(needles)
        };
        Ok(Self { engine })
    }

    /// Build a matcher, falling back to linear scans if the pattern set
    /// cannot be compiled.
    pub fn auto(keywords: &KeywordSet) -> Self {
        match Self::new(keywords, MatchStrategy::Auto) {
            Ok(matcher) => matcher,
            Err(e) => {
                log::warn!("Falling back to linear keyword matching: {}", e);
                Self {
                    engine: Engine::Linear(keywords.iter().map(str::to_lowercase).collect()),
                }
            }
        }
    }

    /// Whether this matcher uses the multi-pattern engine.
    pub fn is_multi_pattern(&self) -> bool {
        matches!(self.engine, Engine::MultiPattern(_))
    }

    /// Presence of each keyword, in keyword order.
    ///
    /// `text` must already be lower-cased.
    pub fn presence(&self, text: &str) -> Vec<bool> {
        match &self.engine {
            Engine::Linear(needles) => needles.iter().map(|n| text.contains(n.as_str())).collect(),
            Engine::MultiPattern(set) => {
                let matches = set.matches(text);
                (0..set.len()).map(|i| matches.matched(i)).collect()
            }
        }
    }
}
