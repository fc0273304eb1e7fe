//! Export output with statistics.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExportFormat;
use crate::error::Result;
use crate::model::Layout;

/// Result of exporting a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOutput {
    /// The serialized bytes
    pub bytes: Vec<u8>,

    /// Format of `bytes`
    pub format: ExportFormat,

    /// Document revision the export was produced from
    pub revision: u64,

    /// Layout statistics
    pub stats: ExportStats,
}

impl ExportOutput {
    /// Get the output length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The output as text, for text formats.
    pub fn as_text(&self) -> Option<&str> {
        if !self.format.is_text() {
            return None;
        }
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Write the bytes to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Statistics collected from a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Number of pages
    pub page_count: u32,

    /// Number of positioned lines
    pub line_count: u32,

    /// Number of blocks with text
    pub block_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for a layout.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut stats = Self {
            page_count: layout.page_count(),
            line_count: layout.line_count() as u32,
            ..Self::default()
        };
        for text in &layout.source {
            if !text.trim().is_empty() {
                stats.block_count += 1;
            }
            stats.count_text(text);
        }
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
