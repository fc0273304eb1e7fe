//! Plain text export.

use crate::model::Layout;

/// Convert a layout to plain text.
///
/// Block texts are joined with a blank line. List markers and positions are
/// not part of the output.
pub fn to_text(layout: &Layout) -> String {
    layout.source.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate;
    use crate::model::{Block, BlockKind, Document, PageGeometry};

    #[test]
    fn test_to_text() {
        let doc = Document::from_blocks(vec![
            Block::title("JANE DOE"),
            Block::with_text(BlockKind::ListItem, "Rust"),
            Block::paragraph("Line one\nLine two"),
        ]);
        let layout = paginate(&doc, &PageGeometry::a4()).unwrap();

        assert_eq!(to_text(&layout), "JANE DOE\n\nRust\n\nLine one\nLine two");
    }

    #[test]
    fn test_empty_document() {
        let layout = paginate(&Document::new(), &PageGeometry::a4()).unwrap();
        assert_eq!(to_text(&layout), "");
    }
}
