//! Coverage state, deltas and the incremental tracker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{KeywordMatcher, KeywordSet, MatchStrategy};
use crate::error::Result;
use crate::model::Document;

/// Keyword presence for one document revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageState {
    /// Revision of the document this state was computed from
    pub revision: u64,

    /// Keywords in set order, with presence
    pub entries: Vec<(String, bool)>,
}

impl CoverageState {
    /// Presence of a keyword, or `None` if it is not in the set.
    pub fn get(&self, keyword: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, present)| *present)
    }

    /// Keywords found in the text.
    pub fn matched(&self) -> Vec<&str> {
        self.filter(true)
    }

    /// Keywords not found in the text.
    pub fn missing(&self) -> Vec<&str> {
        self.filter(false)
    }

    /// Fraction of keywords present; 1.0 for an empty keyword set.
    pub fn ratio(&self) -> f64 {
        if self.entries.is_empty() {
            return 1.0;
        }
        self.matched().len() as f64 / self.entries.len() as f64
    }

    /// Keyword to presence map.
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        self.entries.iter().cloned().collect()
    }

    /// Keywords whose presence differs from `previous`.
    pub fn delta_from(&self, previous: &CoverageState) -> CoverageDelta {
        let mut delta = CoverageDelta::empty(self.revision);
        for (keyword, present) in &self.entries {
            let before = previous.get(keyword).unwrap_or(false);
            match (before, *present) {
                (false, true) => delta.newly_present.push(keyword.clone()),
                (true, false) => delta.newly_absent.push(keyword.clone()),
                _ => {}
            }
        }
        delta
    }

    fn filter(&self, wanted: bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, present)| *present == wanted)
            .map(|(keyword, _)| keyword.as_str())
            .collect()
    }
}

/// Keywords whose presence changed between two revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDelta {
    /// Revision the delta leads to
    pub revision: u64,
    /// Keywords that became present
    pub newly_present: Vec<String>,
    /// Keywords that disappeared
    pub newly_absent: Vec<String>,
}

impl CoverageDelta {
    fn empty(revision: u64) -> Self {
        Self {
            revision,
            ..Default::default()
        }
    }

    /// Check if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.newly_present.is_empty() && self.newly_absent.is_empty()
    }
}

/// Compute keyword presence for a document.
///
/// A keyword is present iff its lower-cased form is a substring of the
/// lower-cased flattened document text.
pub fn recompute(document: &Document, keywords: &KeywordSet) -> CoverageState {
    compute(document, keywords, &KeywordMatcher::auto(keywords))
}

fn compute(document: &Document, keywords: &KeywordSet, matcher: &KeywordMatcher) -> CoverageState {
    let text = document.flattened_text().to_lowercase();
    let entries = keywords
        .iter()
        .map(str::to_string)
        .zip(matcher.presence(&text))
        .collect();
    CoverageState {
        revision: document.revision(),
        entries,
    }
}

/// Tracks keyword coverage across document revisions.
#[derive(Debug, Clone)]
pub struct CoverageTracker {
    keywords: KeywordSet,
    matcher: KeywordMatcher,
    state: Option<CoverageState>,
}

impl CoverageTracker {
    /// Create a tracker for a fixed keyword set.
    pub fn new(keywords: KeywordSet) -> Self {
        let matcher = KeywordMatcher::auto(&keywords);
        Self {
            keywords,
            matcher,
            state: None,
        }
    }

    /// Create a tracker with an explicit matching strategy.
    ///
    /// `Auto` never fails: it falls back to linear scans when the
    /// multi-pattern engine cannot be built. Only an explicit
    /// `MultiPattern` request reports that failure.
    pub fn with_strategy(keywords: KeywordSet, strategy: MatchStrategy) -> Result<Self> {
        let matcher = match strategy {
            MatchStrategy::Auto => KeywordMatcher::auto(&keywords),
            _ => KeywordMatcher::new(&keywords, strategy)?,
        };
        Ok(Self {
            keywords,
            matcher,
            state: None,
        })
    }

    /// The tracked keywords.
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Latest computed state, if any update has happened.
    pub fn state(&self) -> Option<&CoverageState> {
        self.state.as_ref()
    }

    /// Recompute coverage for `document` and report what changed.
    ///
    /// A document whose revision is not newer than the last one seen is
    /// ignored and yields an empty delta.
    pub fn update(&mut self, document: &Document) -> CoverageDelta {
        if let Some(previous) = &self.state {
            if document.revision() <= previous.revision {
                log::debug!(
                    "Ignoring coverage update for revision {} (at {})",
                    document.revision(),
                    previous.revision
                );
                return CoverageDelta::empty(previous.revision);
            }
        }

        let state = compute(document, &self.keywords, &self.matcher);
        let delta = match &self.state {
            Some(previous) => state.delta_from(previous),
            None => CoverageDelta {
                revision: state.revision,
                newly_present: state.matched().into_iter().map(String::from).collect(),
                newly_absent: Vec::new(),
            },
        };
        self.state = Some(state);
        delta
    }
}
