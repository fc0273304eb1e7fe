//! Document-level types.

use serde::{Deserialize, Serialize};

use super::Block;
use crate::error::{Error, Result};

/// An ordered block document with a revision counter.
///
/// A document always holds at least one block. The revision increases with
/// every mutation and identifies the snapshot for staleness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    blocks: Vec<Block>,
    revision: u64,
}

#[derive(Deserialize)]
struct RawDocument {
    blocks: Vec<Block>,
    #[serde(default)]
    revision: u64,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let mut doc = Document::from_blocks(raw.blocks);
        doc.revision = raw.revision;
        doc
    }
}

impl Document {
    /// Create a document holding a single empty paragraph.
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Create a document from blocks, in order.
    ///
    /// An empty list is replaced by a single empty paragraph.
    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::paragraph(""));
        }
        Self {
            blocks,
            revision: 0,
        }
    }

    /// Current revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get a block by index.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Get a block by index or fail with [`Error::BlockOutOfRange`].
    pub fn block_checked(&self, index: usize) -> Result<&Block> {
        self.blocks
            .get(index)
            .ok_or(Error::BlockOutOfRange(index, self.blocks.len()))
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has no text at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }

    /// Text of every block joined with a newline.
    ///
    /// This is the text keyword coverage is computed against; the separator
    /// keeps words in adjacent blocks from fusing.
    pub fn flattened_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text of every block separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Approximate word count (whitespace-separated tokens).
    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| block.plain_text().split_whitespace().count())
            .sum()
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub(crate) fn bump_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    #[test]
    fn test_document_new_has_one_empty_paragraph() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert!(doc.is_empty());
        assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_flattened_and_plain_text() {
        let doc = Document::from_blocks(vec![
            Block::heading("SKILLS"),
            Block::paragraph("Python, Go"),
        ]);

        assert_eq!(doc.flattened_text(), "SKILLS\nPython, Go");
        assert_eq!(doc.plain_text(), "SKILLS\n\nPython, Go");
        assert_eq!(doc.word_count(), 3);
    }

    #[test]
    fn test_block_checked() {
        let doc = Document::new();
        assert!(doc.block_checked(0).is_ok());
        assert!(matches!(
            doc.block_checked(3),
            Err(Error::BlockOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_deserialize_empty_blocks() {
        let doc: Document = serde_json::from_str(r#"{"blocks":[],"revision":7}"#).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.revision(), 7);
    }

    #[test]
    fn test_bump_revision() {
        let mut doc = Document::new();
        assert_eq!(doc.bump_revision(), 1);
        assert_eq!(doc.bump_revision(), 2);
        assert_eq!(doc.revision(), 2);
    }
}
