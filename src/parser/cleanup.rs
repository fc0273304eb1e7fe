//! Input cleanup for text extracted from PDF/DOCX résumés.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Minimal cleanup: Unicode NFC normalization and trailing whitespace only
    Minimal,
    /// Standard cleanup: minimal plus ligatures, bullets and hyphenation
    #[default]
    Standard,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Standardize bullet characters (●, ○, ■ → •)
    pub standardize_bullets: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Join words hyphenated across a line break
    pub fix_hyphenation: bool,

    /// Strip trailing spaces and tabs from every line
    pub trim_trailing_whitespace: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            standardize_bullets: false,
            remove_replacement_char: false,
            fix_hyphenation: false,
            trim_trailing_whitespace: true,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            standardize_bullets: true,
            remove_replacement_char: true,
            fix_hyphenation: true,
            trim_trailing_whitespace: true,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

const LIGATURES: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

const BULLETS: &[char] = &['●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻'];

fn hyphenation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Only across a line break: "full-time" must survive.
    RE.get_or_init(|| Regex::new(r"([A-Za-z])-\n[ \t]*([a-z])").expect("hyphenation pattern"))
}

/// Text cleanup pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    ///
    /// Blank-line boundaries are preserved so paragraph structure survives.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.standardize_bullets {
            result = result.replace(BULLETS, "•");
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.trim_trailing_whitespace {
            result = result
                .split('\n')
                .map(|line| line.trim_end_matches([' ', '\t']))
                .collect::<Vec<_>>()
                .join("\n");
        }

        if self.options.fix_hyphenation {
            result = hyphenation_regex().replace_all(&result, "$1$2").to_string();
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_normalization() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Minimal);
        let decomposed = "cafe\u{0301}";
        assert_eq!(pipeline.process(decomposed), "caf\u{00E9}");
    }

    #[test]
    fn test_ligature_fix() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(pipeline.process("ﬁnancial ﬂows"), "financial flows");
    }

    #[test]
    fn test_bullet_standardization() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        let result = pipeline.process("● Item 1\n■ Item 2");
        assert_eq!(result, "• Item 1\n• Item 2");
    }

    #[test]
    fn test_hyphenation_only_across_line_breaks() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(
            pipeline.process("Led infra-\nstructure work, full-time"),
            "Led infrastructure work, full-time"
        );
    }

    #[test]
    fn test_paragraph_breaks_preserved() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        let result = pipeline.process("SUMMARY   \r\n\r\nText\u{FFFD}");
        assert_eq!(result, "SUMMARY\n\nText");
    }
}
