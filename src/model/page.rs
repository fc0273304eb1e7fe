//! Page-level layout types.

use serde::{Deserialize, Serialize};

use super::{Alignment, PageGeometry, TextStyle};

/// A fragment of a positioned line sharing one text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpan {
    /// Fragment text
    pub text: String,

    /// Fragment style
    pub style: TextStyle,
}

/// A physical line placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedLine {
    /// Index of the source block
    pub block: usize,

    /// Full line text, including any list marker
    pub text: String,

    /// Left edge of the line in points
    pub x: f32,

    /// Baseline position from the top of the page in points
    pub y: f32,

    /// Font size in points
    pub font_size: f32,

    /// Whether the whole line is set bold
    pub bold: bool,

    /// Effective alignment used to compute `x`
    pub align: Alignment,

    /// Styled fragments, concatenating to `text`
    pub spans: Vec<LineSpan>,
}

impl PositionedLine {
    /// Check if the line has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A single page of positioned lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Lines in top-to-bottom order
    pub lines: Vec<PositionedLine>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            lines: Vec::new(),
        }
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the number of lines on the page.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get plain text content of the page, one physical line per text line.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Paginated output for one document revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Revision of the document this layout was computed from
    pub revision: u64,

    /// Geometry used for layout
    pub geometry: PageGeometry,

    /// Pages in order; never empty
    pub pages: Vec<Page>,

    /// Text of every block in document order
    pub source: Vec<String>,
}

impl Layout {
    /// A layout with a single empty page.
    pub fn empty(revision: u64, geometry: PageGeometry) -> Self {
        Self {
            revision,
            geometry,
            pages: vec![Page::new(1)],
            source: Vec::new(),
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Total number of lines across pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Page::line_count).sum()
    }

    /// Iterate over every line with its page number.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &PositionedLine)> {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter().map(move |line| (page.number, line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(block: usize, text: &str, y: f32) -> PositionedLine {
        PositionedLine {
            block,
            text: text.to_string(),
            x: 10.0,
            y,
            font_size: 11.0,
            bold: false,
            align: Alignment::Left,
            spans: vec![LineSpan {
                text: text.to_string(),
                style: TextStyle::default(),
            }],
        }
    }

    #[test]
    fn test_empty_layout_has_one_page() {
        let layout = Layout::empty(3, PageGeometry::a4());
        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].is_empty());
        assert_eq!(layout.line_count(), 0);
        assert!(layout.get_page(0).is_none());
        assert!(layout.get_page(1).is_some());
    }

    #[test]
    fn test_lines_iterates_in_page_order() {
        let mut first = Page::new(1);
        first.lines.push(line(0, "one", 10.0));
        let mut second = Page::new(2);
        second.lines.push(line(0, "two", 10.0));
        second.lines.push(line(1, "   ", 30.0));

        let layout = Layout {
            revision: 0,
            geometry: PageGeometry::a4(),
            pages: vec![first, second],
            source: vec!["one two".into()],
        };

        let pages: Vec<u32> = layout.lines().map(|(page, _)| page).collect();
        assert_eq!(pages, vec![1, 2, 2]);
        assert_eq!(layout.pages[1].plain_text(), "two\n   ");
        assert!(layout.pages[1].lines[1].is_blank());
    }
}
