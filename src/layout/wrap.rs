//! Greedy word wrapping over styled characters.

use super::TextMeasure;
use crate::model::{LineSpan, TextStyle};

/// Slack for float comparisons against the line width.
pub(crate) const EPSILON: f32 = 1e-3;

/// One wrapped line of styled characters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WrappedLine {
    pub chars: Vec<(char, TextStyle)>,
    pub width: f32,
}

impl WrappedLine {
    /// Group the characters into per-style spans.
    pub fn spans(&self) -> Vec<LineSpan> {
        let mut spans: Vec<LineSpan> = Vec::new();
        for &(c, style) in &self.chars {
            match spans.last_mut() {
                Some(span) if span.style == style => span.text.push(c),
                _ => spans.push(LineSpan {
                    text: c.to_string(),
                    style,
                }),
            }
        }
        spans
    }
}

/// Wraps text to a fixed width.
///
/// `\n` forces a break and a blank line is kept as an empty line. Runs of
/// whitespace collapse to one space; whitespace at line edges is dropped.
/// Words wider than the line are broken between characters.
pub(crate) struct Wrapper<'a> {
    measure: &'a dyn TextMeasure,
    font_size: f32,
    width: f32,
    bold: bool,
    lines: Vec<WrappedLine>,
    current: Vec<(char, TextStyle)>,
    current_width: f32,
}

impl<'a> Wrapper<'a> {
    /// `bold` forces the bold face for measurement (bold block kinds).
    pub fn new(measure: &'a dyn TextMeasure, font_size: f32, width: f32, bold: bool) -> Self {
        Self {
            measure,
            font_size,
            width,
            bold,
            lines: Vec::new(),
            current: Vec::new(),
            current_width: 0.0,
        }
    }

    pub fn wrap(mut self, chars: &[(char, TextStyle)]) -> Vec<WrappedLine> {
        for segment in chars.split(|(c, _)| *c == '\n') {
            self.push_segment(segment);
            self.break_line();
        }
        self.lines
    }

    fn push_segment(&mut self, segment: &[(char, TextStyle)]) {
        let mut space: Option<(char, TextStyle)> = None;
        let mut word: Vec<(char, TextStyle)> = Vec::new();

        for &(c, style) in segment {
            if c.is_whitespace() {
                if !word.is_empty() {
                    self.push_word(space.take(), &word);
                    word.clear();
                }
                space.get_or_insert((' ', style));
            } else {
                word.push((c, style));
            }
        }
        if !word.is_empty() {
            self.push_word(space.take(), &word);
        }
    }

    fn push_word(&mut self, space: Option<(char, TextStyle)>, word: &[(char, TextStyle)]) {
        let word_width: f32 = word.iter().map(|&sc| self.char_width(sc)).sum();

        if !self.current.is_empty() {
            let space_width = space.map(|sc| self.char_width(sc)).unwrap_or(0.0);
            if self.current_width + space_width + word_width <= self.width + EPSILON {
                self.current.extend(space);
                self.current.extend_from_slice(word);
                self.current_width += space_width + word_width;
                return;
            }
            self.break_line();
        }

        if word_width <= self.width + EPSILON {
            self.current.extend_from_slice(word);
            self.current_width = word_width;
            return;
        }

        log::debug!(
            "Word of {} chars is wider than {:.1}pt, breaking by character",
            word.len(),
            self.width
        );
        for &sc in word {
            let w = self.char_width(sc);
            if !self.current.is_empty() && self.current_width + w > self.width + EPSILON {
                self.break_line();
            }
            self.current.push(sc);
            self.current_width += w;
        }
    }

    fn break_line(&mut self) {
        self.lines.push(WrappedLine {
            chars: std::mem::take(&mut self.current),
            width: self.current_width,
        });
        self.current_width = 0.0;
    }

    fn char_width(&self, (c, style): (char, TextStyle)) -> f32 {
        let style = if self.bold {
            TextStyle { bold: true, ..style }
        } else {
            style
        };
        self.measure.char_width(c, self.font_size, style)
    }
}
