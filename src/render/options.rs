//! Export options and configuration.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JsonFormat;
use crate::error::Error;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Paginated PDF document
    #[default]
    Document,
    /// UTF-8 text, blocks separated by a blank line
    PlainText,
    /// The paginated layout as JSON
    Json,
}

impl ExportFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Document => "pdf",
            ExportFormat::PlainText => "txt",
            ExportFormat::Json => "json",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Document => "application/pdf",
            ExportFormat::PlainText => "text/plain; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    /// Check if the output is UTF-8 text.
    pub fn is_text(self) -> bool {
        !matches!(self, ExportFormat::Document)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Document => "document",
            ExportFormat::PlainText => "plain-text",
            ExportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" | "pdf" => Ok(ExportFormat::Document),
            "plain-text" | "text" | "txt" => Ok(ExportFormat::PlainText),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::Render(format!("unknown export format: {}", other))),
        }
    }
}

/// Font family of the PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Sans-serif (default)
    #[default]
    Helvetica,
    /// Serif
    Times,
}

/// Options for exporting a layout.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Output format
    pub format: ExportFormat,

    /// JSON layout of [`ExportFormat::Json`]
    pub json_format: JsonFormat,

    /// Flate-compress PDF content streams
    pub compress: bool,

    /// PDF font family
    pub font_family: FontFamily,

    /// Document title for the PDF info dictionary
    pub title: Option<String>,

    /// Document author for the PDF info dictionary
    pub author: Option<String>,

    /// Creation date for the PDF info dictionary; omitted when unset so
    /// output stays reproducible
    pub creation_date: Option<DateTime<Utc>>,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the PDF font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }
}
