//! Property-Based Tests
//!
//! Invariants checked over generated inputs:
//! - Inference always yields a non-empty document
//! - Layout is deterministic and keeps baselines inside the page
//! - Keyword presence equals case-insensitive substring containment
//! - Undoing every edit restores the original document, redoing restores the edited one,
//!   and undo after redo restores the document before the last edit

use cvpress::coverage::recompute;
use cvpress::{infer, paginate, Block, Document, Editor, KeywordSet, PageGeometry};
use proptest::prelude::*;

// ============================================================================
// Inference Properties
// ============================================================================

/// Property: Any text infers to at least one block, deterministically
#[test]
fn proptest_infer_never_empty() {
    proptest!(|(text in "[A-Za-z0-9 :,.\\n-]{0,300}")| {
        let doc = infer(&text);
        prop_assert!(!doc.is_empty());
        prop_assert_eq!(doc.revision(), 0);
        prop_assert_eq!(infer(&text), doc);
    });
}

/// Property: Unicode input should not panic
#[test]
fn proptest_infer_unicode() {
    proptest!(|(text in "\\PC{0,200}")| {
        let doc = infer(&text);
        prop_assert!(doc.len() >= 1);
    });
}

// ============================================================================
// Layout Properties
// ============================================================================

/// Property: Layout is deterministic, pages are numbered 1..=n and every
/// baseline sits inside the usable area
#[test]
fn proptest_layout_bounds() {
    proptest!(ProptestConfig::with_cases(64), |(text in "[A-Za-z ,.\\n]{0,2000}")| {
        let geometry = PageGeometry::a4();
        let doc = infer(&text);
        let layout = paginate(&doc, &geometry).unwrap();

        prop_assert_eq!(&paginate(&doc, &geometry).unwrap(), &layout);
        prop_assert!(layout.page_count() >= 1);
        for (index, page) in layout.pages.iter().enumerate() {
            prop_assert_eq!(page.number as usize, index + 1);
        }
        for (_, line) in layout.lines() {
            prop_assert!(line.y >= geometry.margin_top);
            prop_assert!(line.y <= geometry.content_bottom() + 1e-3);
            prop_assert!(line.x >= geometry.margin_left - 1e-3);
        }
    });
}

// ============================================================================
// Coverage Properties
// ============================================================================

/// Property: A keyword is present iff it occurs case-insensitively
#[test]
fn proptest_coverage_is_substring() {
    proptest!(|(
        text in "[a-zA-Z ]{0,80}",
        keywords in prop::collection::vec("[a-zA-Z]{1,3}", 0..8)
    )| {
        let doc = Document::from_blocks(vec![Block::paragraph(text)]);
        let set = KeywordSet::new(keywords.clone());
        let state = recompute(&doc, &set);
        let haystack = doc.flattened_text().to_lowercase();

        prop_assert_eq!(state.entries.len(), set.len());
        for keyword in set.iter() {
            let expected = haystack.contains(&keyword.to_lowercase());
            prop_assert_eq!(state.get(keyword), Some(expected));
        }
    });
}

// ============================================================================
// History Properties
// ============================================================================

/// Property: Undo and redo walk between the original and edited documents
#[test]
fn proptest_undo_redo_roundtrip() {
    proptest!(|(
        edits in prop::collection::vec((any::<usize>(), any::<usize>(), "[a-z ]{1,3}"), 1..20)
    )| {
        let original = Document::from_blocks(vec![
            Block::title("JANE DOE"),
            Block::paragraph("Rust, Go"),
        ]);
        let mut editor = Editor::new(original.clone());
        let mut before_last = original.blocks().to_vec();

        for (block, offset, text) in &edits {
            before_last = editor.document().blocks().to_vec();
            let index = block % editor.document().len();
            let len = editor.document().blocks()[index].char_len();
            let offset = offset % (len + 1);
            if offset == len && offset > 0 && block % 3 == 0 {
                editor.split_block(index, offset).unwrap();
            } else {
                editor.insert_text(index, offset, text).unwrap();
            }
        }
        let edited = editor.document().clone();

        while editor.undo() {}
        prop_assert_eq!(editor.document().blocks(), original.blocks());

        while editor.redo() {}
        prop_assert_eq!(editor.document().blocks(), edited.blocks());
        prop_assert!(editor.revision() > edited.revision());

        // Undo after redo lands back on the document before the last edit.
        prop_assert!(editor.undo());
        prop_assert_eq!(editor.document().blocks(), before_last.as_slice());
        prop_assert!(editor.redo());
        prop_assert_eq!(editor.document().blocks(), edited.blocks());
    });
}
