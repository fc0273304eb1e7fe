//! Text width measurement.

use unicode_width::UnicodeWidthChar;

use crate::model::TextStyle;

/// Measures rendered text width in points.
///
/// Implementations must be deterministic: layout relies on identical inputs
/// producing identical widths.
pub trait TextMeasure: Send + Sync {
    /// Advance width of one character.
    fn char_width(&self, ch: char, font_size: f32, style: TextStyle) -> f32;

    /// Width of a string in one style.
    ///
    /// Default sums [`TextMeasure::char_width`].
    fn text_width(&self, text: &str, font_size: f32, style: TextStyle) -> f32 {
        text.chars()
            .map(|ch| self.char_width(ch, font_size, style))
            .sum()
    }
}

/// Default ratio of average glyph advance to font size.
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Fixed average advance per display column.
///
/// Wide (CJK) characters count as two columns, zero-width and control
/// characters as none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageCharWidth {
    /// Advance of one column as a fraction of the font size
    pub ratio: f32,
}

impl AverageCharWidth {
    /// Create a measure with the given ratio.
    pub fn new(ratio: f32) -> Self {
        Self { ratio }
    }
}

impl Default for AverageCharWidth {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_WIDTH_RATIO)
    }
}

impl TextMeasure for AverageCharWidth {
    fn char_width(&self, ch: char, font_size: f32, _style: TextStyle) -> f32 {
        let columns = ch.width().unwrap_or(0);
        columns as f32 * font_size * self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_char_width() {
        let measure = AverageCharWidth::default();
        let style = TextStyle::default();

        assert_eq!(measure.char_width('a', 10.0, style), 5.0);
        assert_eq!(measure.char_width('漢', 10.0, style), 10.0);
        assert_eq!(measure.char_width('\u{200B}', 10.0, style), 0.0);
        assert_eq!(measure.text_width("abcd", 11.0, style), 22.0);
    }
}
