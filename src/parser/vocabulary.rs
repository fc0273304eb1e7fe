//! Section-name vocabulary used for heading detection.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Section names recognized out of the box.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "SUMMARY",
    "EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "PROJECTS",
    "CERTIFICATIONS",
    "CONTACT",
    "OBJECTIVE",
    "WORK EXPERIENCE",
    "PROFESSIONAL EXPERIENCE",
];

/// A replaceable table of section names.
///
/// A paragraph whose text starts with one of the names, compared
/// case-insensitively, is treated as a section heading. Matching is a plain
/// prefix test with no word boundary, so "Skillset" matches "SKILLS".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SectionVocabulary {
    names: Vec<String>,
    folded: Vec<String>,
}

impl SectionVocabulary {
    /// Build a vocabulary from section names.
    ///
    /// Blank names are ignored since they would match every paragraph.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.trim().is_empty())
            .collect();
        let folded = names.iter().map(|name| name.to_lowercase()).collect();
        Self { names, folded }
    }

    /// A vocabulary that recognizes nothing.
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Load a vocabulary from a JSON array of strings.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Vocabulary(e.to_string()))
    }

    /// Add more section names.
    pub fn extend<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = self.names;
        all.extend(names.into_iter().map(Into::into));
        Self::new(all)
    }

    /// Section names in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check if the vocabulary has no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The first section name `text` starts with, if any.
    pub fn matching_name(&self, text: &str) -> Option<&str> {
        let folded_text = text.to_lowercase();
        self.folded
            .iter()
            .position(|name| folded_text.starts_with(name.as_str()))
            .map(|index| self.names[index].as_str())
    }

    /// Check if `text` starts with a section name.
    pub fn matches(&self, text: &str) -> bool {
        self.matching_name(text).is_some()
    }
}

impl Default for SectionVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SECTIONS.iter().copied())
    }
}

impl From<Vec<String>> for SectionVocabulary {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<SectionVocabulary> for Vec<String> {
    fn from(vocabulary: SectionVocabulary) -> Self {
        vocabulary.names
    }
}
