//! Minimal PDF 1.4 writer for paginated layouts.
//!
//! Produces one page object per layout page using the base-14 fonts, so no
//! font data is embedded. Text is encoded as WinAnsi; characters outside it
//! are replaced with `?`.

use std::fmt::Write as _;
use std::io::Write as _;

use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::{ExportOptions, FontFamily};
use crate::error::{Error, Result};
use crate::layout::{AverageCharWidth, TextMeasure};
use crate::model::{Layout, Page, PositionedLine, TextStyle};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FIRST_FONT_ID: usize = 3;
const INFO_ID: usize = 7;
const FIRST_PAGE_ID: usize = 8;

/// Render a layout as PDF bytes.
pub fn to_pdf(layout: &Layout, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut writer = PdfWriter::new(layout, options);
    writer.write()
}

struct PdfWriter<'a> {
    layout: &'a Layout,
    options: &'a ExportOptions,
    measure: AverageCharWidth,
    unencodable: usize,
}

impl<'a> PdfWriter<'a> {
    fn new(layout: &'a Layout, options: &'a ExportOptions) -> Self {
        Self {
            layout,
            options,
            measure: AverageCharWidth::default(),
            unencodable: 0,
        }
    }

    fn write(&mut self) -> Result<Vec<u8>> {
        let layout = self.layout;
        let page_count = layout.pages.len();
        let mut objects: Vec<Vec<u8>> = Vec::with_capacity(FIRST_PAGE_ID + 2 * page_count);

        objects.push(format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).into_bytes());

        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", page_object_id(i)))
            .collect();
        objects.push(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_count
            )
            .into_bytes(),
        );

        for (bold, italic) in [(false, false), (true, false), (false, true), (true, true)] {
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    self.options.font_family.base_font(bold, italic)
                )
                .into_bytes(),
            );
        }

        let info = self.info_dictionary();
        objects.push(info.into_bytes());

        let fonts: String = (0..4)
            .map(|i| format!("/F{} {} 0 R", i + 1, FIRST_FONT_ID + i))
            .collect::<Vec<_>>()
            .join(" ");
        let geometry = &layout.geometry;

        for (i, page) in layout.pages.iter().enumerate() {
            objects.push(
                format!(
                    "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << {} >> >> /Contents {} 0 R >>",
                    PAGES_ID,
                    number(geometry.width),
                    number(geometry.height),
                    fonts,
                    page_object_id(i) + 1
                )
                .into_bytes(),
            );
            let content = self.page_content(page);
            objects.push(self.stream_object(content.into_bytes())?);
        }

        if self.unencodable > 0 {
            log::warn!(
                "{} characters have no WinAnsi encoding and were replaced with '?'",
                self.unencodable
            );
        }

        Ok(assemble(&objects))
    }

    fn info_dictionary(&mut self) -> String {
        let options = self.options;
        let mut info = String::from("<< /Producer (cvpress)");
        if let Some(title) = options.title.as_deref() {
            let _ = write!(info, " /Title ({})", self.encode(title));
        }
        if let Some(author) = options.author.as_deref() {
            let _ = write!(info, " /Author ({})", self.encode(author));
        }
        if let Some(date) = options.creation_date {
            let _ = write!(info, " /CreationDate ({})", format_pdf_date(&date));
        }
        info.push_str(" >>");
        info
    }

    fn page_content(&mut self, page: &Page) -> String {
        let height = self.layout.geometry.height;
        let mut content = String::new();
        for line in &page.lines {
            self.line_content(line, height, &mut content);
        }
        content
    }

    fn line_content(&mut self, line: &PositionedLine, page_height: f32, out: &mut String) {
        if line.spans.is_empty() {
            return;
        }
        let baseline = page_height - line.y;

        let _ = write!(out, "BT {} {} Td", number(line.x), number(baseline));
        for span in &line.spans {
            let font = font_index(line.bold || span.style.bold, span.style.italic);
            let text = self.encode(&span.text);
            let _ = write!(out, " /F{} {} Tf ({}) Tj", font, number(line.font_size), text);
        }
        out.push_str(" ET\n");

        // Underlines use the estimated advance of each span.
        let mut x = line.x;
        for span in &line.spans {
            let style = TextStyle {
                bold: line.bold || span.style.bold,
                ..span.style
            };
            let width = self.measure.text_width(&span.text, line.font_size, style);
            if span.style.underline && !span.text.trim().is_empty() {
                let y = baseline - line.font_size * 0.12;
                let _ = writeln!(
                    out,
                    "{} w {} {} m {} {} l S",
                    number(line.font_size * 0.05),
                    number(x),
                    number(y),
                    number(x + width),
                    number(y)
                );
            }
            x += width;
        }
    }

    fn stream_object(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let (data, filter) = if self.options.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(&data)
                .and_then(|_| encoder.finish())
                .map(|compressed| (compressed, " /Filter /FlateDecode"))
                .map_err(|e| Error::Render(format!("content compression failed: {}", e)))?
        } else {
            (data, "")
        };

        let mut object = format!("<< /Length {}{} >>\nstream\n", data.len(), filter).into_bytes();
        object.extend_from_slice(&data);
        object.extend_from_slice(b"\nendstream");
        Ok(object)
    }

    /// Encode text as an escaped WinAnsi literal string body.
    fn encode(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let byte = match win_ansi(ch) {
                Some(byte) => byte,
                None => {
                    self.unencodable += 1;
                    b'?'
                }
            };
            match byte {
                b'(' | b')' | b'\\' => {
                    out.push('\\');
                    out.push(byte as char);
                }
                0x20..=0x7E => out.push(byte as char),
                _ => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
            }
        }
        out
    }
}

impl FontFamily {
    /// Base-14 font name for a weight and slant.
    pub fn base_font(self, bold: bool, italic: bool) -> &'static str {
        match (self, bold, italic) {
            (FontFamily::Helvetica, false, false) => "Helvetica",
            (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
            (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Times, false, false) => "Times-Roman",
            (FontFamily::Times, true, false) => "Times-Bold",
            (FontFamily::Times, false, true) => "Times-Italic",
            (FontFamily::Times, true, true) => "Times-BoldItalic",
        }
    }
}

fn font_index(bold: bool, italic: bool) -> usize {
    1 + usize::from(bold) + 2 * usize::from(italic)
}

fn page_object_id(page_index: usize) -> usize {
    FIRST_PAGE_ID + 2 * page_index
}

/// Write header, numbered objects, cross-reference table and trailer.
fn assemble(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        CATALOG_ID,
        INFO_ID,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Format a number with at most two decimals and no trailing zeros.
fn number(value: f32) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Format a PDF date string (D:YYYYMMDDHHmmSSZ).
fn format_pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// WinAnsiEncoding byte for a character.
fn win_ansi(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        // Tabs and line breaks render as spaces.
        0x09 | 0x0A | 0x0D => Some(b' '),
        _ => match ch {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}
