//! Block and text-run types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural kind of a block.
///
/// The set is closed; layout and rendering dispatch on it exhaustively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Name/contact banner at the top of a résumé
    Title,
    /// Section heading (SUMMARY, EXPERIENCE, ...)
    Heading,
    /// Third-level heading (job title, degree, ...)
    Subheading,
    /// Body paragraph (default)
    #[default]
    Paragraph,
    /// Bulleted list item
    ListItem,
    /// Numbered list item
    OrderedListItem,
}

impl BlockKind {
    /// Check if this kind is a bulleted or numbered list item.
    pub fn is_list(self) -> bool {
        matches!(self, BlockKind::ListItem | BlockKind::OrderedListItem)
    }

    /// Check if this kind is a heading or subheading.
    pub fn is_heading(self) -> bool {
        matches!(self, BlockKind::Heading | BlockKind::Subheading)
    }

    /// Whether text of this kind is set in the bold face by default.
    pub fn is_bold(self) -> bool {
        matches!(
            self,
            BlockKind::Title | BlockKind::Heading | BlockKind::Subheading
        )
    }

    /// Snake-case name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Title => "title",
            BlockKind::Heading => "heading",
            BlockKind::Subheading => "subheading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::ListItem => "list_item",
            BlockKind::OrderedListItem => "ordered_list_item",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

/// A character formatting attribute that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// Bold weight
    Bold,
    /// Italic slant
    Italic,
    /// Underline
    Underline,
}

/// Text styling properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline
    }

    /// Read a single attribute.
    pub fn get(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Bold => self.bold,
            Attribute::Italic => self.italic,
            Attribute::Underline => self.underline,
        }
    }

    /// Return a copy with one attribute set or cleared.
    pub fn with(mut self, attribute: Attribute, value: bool) -> Self {
        match attribute {
            Attribute::Bold => self.bold = value,
            Attribute::Italic => self.italic = value,
            Attribute::Underline => self.underline = value,
        }
        self
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::default())
    }

    /// Create a text run with an explicit style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                bold: true,
                ..Default::default()
            },
        )
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                italic: true,
                ..Default::default()
            },
        )
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length of the run in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A single structural unit of the document.
///
/// Runs are kept normalized: no empty runs and no two adjacent runs with the
/// same style. Every mutator below re-establishes that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Structural kind
    pub kind: BlockKind,

    /// Styled text runs
    pub runs: Vec<TextRun>,

    /// Horizontal alignment
    pub alignment: Alignment,
}

impl Block {
    /// Create an empty block of the given kind.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            runs: Vec::new(),
            alignment: Alignment::default(),
        }
    }

    /// Create a block holding a single unstyled run.
    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        let mut block = Self::new(kind);
        block.push_run(TextRun::new(text));
        block
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Paragraph, text)
    }

    /// Create a centered title block.
    pub fn title(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Title, text).aligned(Alignment::Center)
    }

    /// Create a section heading block.
    pub fn heading(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Heading, text)
    }

    /// Set the alignment, builder style.
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Append a run, merging it into the last run when the styles match.
    pub fn push_run(&mut self, run: TextRun) {
        if run.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == run.style => last.text.push_str(&run.text),
            _ => self.runs.push(run),
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Length of the block text in characters.
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    /// Check if the block has no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(TextRun::is_empty)
    }

    /// Check if the block only contains whitespace.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| run.text.trim().is_empty())
    }

    /// Flatten the runs into one styled character per entry.
    pub fn styled_chars(&self) -> Vec<(char, TextStyle)> {
        self.runs
            .iter()
            .flat_map(|run| run.text.chars().map(move |c| (c, run.style)))
            .collect()
    }

    /// Replace the runs with the given styled characters.
    pub fn set_styled_chars(&mut self, chars: impl IntoIterator<Item = (char, TextStyle)>) {
        self.runs.clear();
        let mut current: Option<TextRun> = None;
        for (c, style) in chars {
            match current {
                Some(ref mut run) if run.style == style => run.text.push(c),
                _ => {
                    if let Some(run) = current.take() {
                        self.runs.push(run);
                    }
                    current = Some(TextRun::styled(c.to_string(), style));
                }
            }
        }
        if let Some(run) = current {
            self.runs.push(run);
        }
    }

    /// Style newly typed text at `offset` picks up.
    ///
    /// That is the style of the character before the offset, or of the first
    /// character when typing at the very start.
    pub fn style_at(&self, offset: usize) -> TextStyle {
        let chars = self.styled_chars();
        if offset > 0 {
            if let Some((_, style)) = chars.get(offset - 1) {
                return *style;
            }
        }
        chars.first().map(|(_, style)| *style).unwrap_or_default()
    }

    /// Re-establish the run invariants after direct mutation of `runs`.
    pub fn normalize(&mut self) {
        let runs = std::mem::take(&mut self.runs);
        for run in runs {
            self.push_run(run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_plain_text() {
        let mut block = Block::new(BlockKind::Paragraph);
        block.push_run(TextRun::new("Hello "));
        block.push_run(TextRun::bold("world"));
        block.push_run(TextRun::new("!"));

        assert_eq!(block.plain_text(), "Hello world!");
        assert_eq!(block.char_len(), 12);
        assert_eq!(block.runs.len(), 3);
    }

    #[test]
    fn test_push_run_merges_same_style() {
        let mut block = Block::paragraph("Go");
        block.push_run(TextRun::new("lang"));
        block.push_run(TextRun::new(""));

        assert_eq!(block.runs, vec![TextRun::new("Golang")]);
    }

    #[test]
    fn test_styled_chars_roundtrip_normalizes() {
        let mut block = Block::paragraph("ab");
        let mut chars = block.styled_chars();
        chars.push(('c', TextStyle::default()));
        chars.push(('d', TextStyle::default().with(Attribute::Italic, true)));
        block.set_styled_chars(chars);

        assert_eq!(
            block.runs,
            vec![TextRun::new("abc"), TextRun::italic("d")]
        );
    }

    #[test]
    fn test_style_at() {
        let mut block = Block::new(BlockKind::Paragraph);
        block.push_run(TextRun::bold("ab"));
        block.push_run(TextRun::new("cd"));

        assert!(block.style_at(0).bold);
        assert!(block.style_at(2).bold);
        assert!(!block.style_at(3).bold);
        assert_eq!(Block::new(BlockKind::Heading).style_at(0), TextStyle::default());
    }

    #[test]
    fn test_normalize_drops_empty_runs() {
        let mut block = Block::new(BlockKind::Paragraph);
        block.runs = vec![
            TextRun::new("a"),
            TextRun::bold(""),
            TextRun::new("b"),
        ];
        block.normalize();

        assert_eq!(block.runs, vec![TextRun::new("ab")]);
    }

    #[test]
    fn test_kind_helpers() {
        assert!(BlockKind::OrderedListItem.is_list());
        assert!(BlockKind::Subheading.is_heading());
        assert!(!BlockKind::Paragraph.is_bold());
        assert_eq!(BlockKind::ListItem.to_string(), "list_item");
    }

    #[test]
    fn test_title_is_centered() {
        let title = Block::title("JANE DOE");
        assert_eq!(title.kind, BlockKind::Title);
        assert_eq!(title.alignment, Alignment::Center);
    }
}
