//! Structure inference options and configuration.

use super::{CleanupOptions, CleanupPreset, SectionVocabulary};

/// Default length limit for the title heuristic, in characters.
pub const DEFAULT_TITLE_MAX_LEN: usize = 50;

/// Options for inferring a block document from plain text.
#[derive(Debug, Clone)]
pub struct InferOptions {
    /// Section names that mark a heading
    pub vocabulary: SectionVocabulary,

    /// Paragraphs shorter than this (in characters) may be a title
    pub title_max_len: usize,

    /// Cleanup applied to the raw text before inference
    pub cleanup: Option<CleanupOptions>,
}

impl InferOptions {
    /// Create new infer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the section vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: SectionVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the title length limit.
    pub fn with_title_max_len(mut self, len: usize) -> Self {
        self.title_max_len = len;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            vocabulary: SectionVocabulary::default(),
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            cleanup: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_options_builder() {
        let options = InferOptions::new()
            .with_title_max_len(30)
            .with_cleanup_preset(CleanupPreset::Minimal)
            .with_vocabulary(SectionVocabulary::new(["AWARDS"]));

        assert_eq!(options.title_max_len, 30);
        assert_eq!(options.cleanup, Some(CleanupOptions::minimal()));
        assert!(options.vocabulary.matches("Awards"));
    }

    #[test]
    fn test_defaults() {
        let options = InferOptions::default();
        assert_eq!(options.title_max_len, DEFAULT_TITLE_MAX_LEN);
        assert!(options.cleanup.is_none());
        assert!(options.vocabulary.matches("SKILLS"));
    }
}
