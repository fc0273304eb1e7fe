//! Target keyword sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered, de-duplicated set of target keywords.
///
/// Keywords keep their original spelling and first-seen order; matching is
/// case-insensitive and happens elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Create a keyword set, dropping exact duplicates.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let keywords = keywords
            .into_iter()
            .map(Into::into)
            .filter(|keyword: &String| seen.insert(keyword.clone()))
            .collect();
        Self { keywords }
    }

    /// Parse one keyword per line, or comma separated. Blank entries are skipped.
    pub fn parse_list(text: &str) -> Self {
        Self::new(
            text.split(['\n', ','])
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty()),
        )
    }

    /// Load keywords from a JSON array of strings.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Keyword(e.to_string()))
    }

    /// Keywords in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// Iterate keywords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Check if a keyword (exact spelling) is in the set.
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
