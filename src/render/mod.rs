//! Export of paginated layouts to bytes.
//!
//! A [`Layout`] is serialized as a minimal PDF document, as plain text or as
//! JSON. Serializers only read the layout; an empty single-page layout
//! serializes like any other.

mod json;
mod options;
mod pdf;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{ExportFormat, ExportOptions, FontFamily};
pub use pdf::to_pdf;
pub use result::{ExportOutput, ExportStats};
pub use text::to_text;

use crate::error::Result;
use crate::model::Layout;

/// Serialize a layout in the format selected by `options`.
pub fn serialize(layout: &Layout, options: &ExportOptions) -> Result<Vec<u8>> {
    match options.format {
        ExportFormat::Document => to_pdf(layout, options),
        ExportFormat::PlainText => Ok(to_text(layout).into_bytes()),
        ExportFormat::Json => Ok(to_json(layout, options.json_format)?.into_bytes()),
    }
}

/// Serialize a layout and collect statistics.
pub fn export(layout: &Layout, options: &ExportOptions) -> Result<ExportOutput> {
    let bytes = serialize(layout, options)?;
    let stats = ExportStats::from_layout(layout);
    log::debug!(
        "Exported revision {} as {} ({} bytes, {} pages)",
        layout.revision,
        options.format,
        bytes.len(),
        stats.page_count
    );
    Ok(ExportOutput {
        bytes,
        format: options.format,
        revision: layout.revision,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate;
    use crate::model::{Block, Document, PageGeometry};

    #[test]
    fn test_export_formats() {
        let doc = Document::from_blocks(vec![Block::paragraph("Hello")]);
        let layout = paginate(&doc, &PageGeometry::a4()).unwrap();

        let pdf = export(&layout, &ExportOptions::default()).unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(pdf.stats.page_count, 1);

        let text = export(
            &layout,
            &ExportOptions::new().with_format(ExportFormat::PlainText),
        )
        .unwrap();
        assert_eq!(text.as_text(), Some("Hello"));
        assert_eq!(text.revision, 0);

        let json = serialize(&layout, &ExportOptions::new().with_format(ExportFormat::Json)).unwrap();
        assert!(json.starts_with(b"{"));
    }

    #[test]
    fn test_export_does_not_mutate_layout() {
        let doc = Document::from_blocks(vec![Block::heading("SKILLS")]);
        let layout = paginate(&doc, &PageGeometry::a4()).unwrap();
        let before = layout.clone();

        export(&layout, &ExportOptions::default()).unwrap();
        assert_eq!(layout, before);
    }
}
