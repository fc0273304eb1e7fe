//! Page geometry used for layout.

use serde::{Deserialize, Serialize};

use super::BlockKind;
use crate::error::{Error, Result};

/// A metric that differs per block kind (font size, line height).
///
/// List items share the body metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindMetrics {
    /// Title value
    pub title: f32,
    /// Heading value
    pub heading: f32,
    /// Subheading value
    pub subheading: f32,
    /// Paragraph and list item value
    pub body: f32,
}

impl KindMetrics {
    /// Same value for every kind.
    pub fn uniform(value: f32) -> Self {
        Self {
            title: value,
            heading: value,
            subheading: value,
            body: value,
        }
    }

    /// Value for a block kind.
    pub fn get(&self, kind: BlockKind) -> f32 {
        match kind {
            BlockKind::Title => self.title,
            BlockKind::Heading => self.heading,
            BlockKind::Subheading => self.subheading,
            BlockKind::Paragraph | BlockKind::ListItem | BlockKind::OrderedListItem => self.body,
        }
    }

    fn all(&self) -> [f32; 4] {
        [self.title, self.heading, self.subheading, self.body]
    }
}

/// Fixed page dimensions and typography for one export, in points
/// (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,

    /// Page height
    pub height: f32,

    /// Top margin; the first baseline on a page sits here
    pub margin_top: f32,

    /// Bottom margin; no baseline may fall below `height - margin_bottom`
    pub margin_bottom: f32,

    /// Left margin
    pub margin_left: f32,

    /// Right margin
    pub margin_right: f32,

    /// Font size per block kind
    pub font_size: KindMetrics,

    /// Line advance per block kind
    pub line_height: KindMetrics,

    /// Extra leading before headings that are not first on a page
    #[serde(default)]
    pub heading_space_before: f32,

    /// Extra gap after paragraph blocks
    #[serde(default)]
    pub paragraph_space_after: f32,

    /// Left indent of list items
    #[serde(default)]
    pub list_indent: f32,
}

impl PageGeometry {
    /// A4 portrait (210 x 297 mm) with 20 mm margins.
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin_top: 56.7,
            margin_bottom: 56.7,
            margin_left: 56.7,
            margin_right: 56.7,
            font_size: KindMetrics {
                title: 18.0,
                heading: 14.0,
                subheading: 12.0,
                body: 11.0,
            },
            line_height: KindMetrics {
                title: 22.0,
                heading: 19.0,
                subheading: 17.0,
                body: 14.0,
            },
            heading_space_before: 17.0,
            paragraph_space_after: 8.5,
            list_indent: 14.0,
        }
    }

    /// US Letter portrait (8.5 x 11 inches) with the A4 typography.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            ..Self::a4()
        }
    }

    /// Load a geometry from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidGeometry(e.to_string()))
    }

    /// Set the page size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set all four margins.
    pub fn with_margins(mut self, margin: f32) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Set the font sizes.
    pub fn with_font_size(mut self, font_size: KindMetrics) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the line heights.
    pub fn with_line_height(mut self, line_height: KindMetrics) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the extra spacing around headings and paragraphs.
    pub fn with_spacing(mut self, heading_before: f32, paragraph_after: f32) -> Self {
        self.heading_space_before = heading_before;
        self.paragraph_space_after = paragraph_after;
        self
    }

    /// Set the list indent.
    pub fn with_list_indent(mut self, indent: f32) -> Self {
        self.list_indent = indent;
        self
    }

    /// Usable line width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest baseline position allowed on a page.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Check the geometry can hold text.
    pub fn validate(&self) -> Result<()> {
        let numbers = [
            self.width,
            self.height,
            self.margin_top,
            self.margin_bottom,
            self.margin_left,
            self.margin_right,
            self.heading_space_before,
            self.paragraph_space_after,
            self.list_indent,
        ];
        if numbers.iter().any(|n| !n.is_finite() || *n < 0.0) {
            return Err(Error::InvalidGeometry(
                "dimensions must be finite and non-negative".to_string(),
            ));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "no usable width: page is {} wide with {} + {} margins",
                self.width, self.margin_left, self.margin_right
            )));
        }
        if self.content_width() <= self.list_indent {
            return Err(Error::InvalidGeometry(format!(
                "list indent {} leaves no usable width",
                self.list_indent
            )));
        }
        if self.font_size.all().iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::InvalidGeometry(
                "font sizes must be positive".to_string(),
            ));
        }
        if self
            .line_height
            .all()
            .iter()
            .any(|h| !h.is_finite() || *h <= 0.0)
        {
            return Err(Error::InvalidGeometry(
                "line heights must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
