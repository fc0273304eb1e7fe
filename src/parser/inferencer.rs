//! Plain text to block document inference.

use crate::model::{Block, Document};

use super::{CleanupPipeline, InferOptions};

/// Infers an ordered block document from unstructured résumé text.
///
/// Inference is pure and deterministic. Paragraphs are separated by blank
/// lines and classified top-down, first match wins:
///
/// 1. starts with a known section name: heading (first line) followed by a
///    paragraph holding any remaining lines,
/// 2. short, fully upper-case and without a colon: title,
/// 3. anything else: paragraph, newlines kept as soft breaks.
#[derive(Debug, Clone, Default)]
pub struct StructureInferencer {
    options: InferOptions,
}

impl StructureInferencer {
    /// Create an inferencer with the given options.
    pub fn new(options: InferOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &InferOptions {
        &self.options
    }

    /// Infer a document from raw text.
    ///
    /// Empty or whitespace-only input yields a single empty paragraph.
    pub fn infer(&self, raw: &str) -> Document {
        let text = match self.options.cleanup {
            Some(ref cleanup) => CleanupPipeline::new(cleanup.clone()).process(raw),
            None => raw.replace("\r\n", "\n").replace('\r', "\n"),
        };

        let mut blocks = Vec::new();
        for paragraph in split_paragraphs(&text) {
            self.classify(&paragraph, &mut blocks);
        }

        log::debug!("Inferred {} blocks from {} bytes", blocks.len(), raw.len());
        Document::from_blocks(blocks)
    }

    fn classify(&self, paragraph: &str, blocks: &mut Vec<Block>) {
        if let Some(name) = self.options.vocabulary.matching_name(paragraph) {
            let (first, rest) = match paragraph.split_once('\n') {
                Some((first, rest)) => (first.trim_end(), rest.trim()),
                None => (paragraph, ""),
            };
            log::debug!("Section heading {:?} (matched {})", first, name);
            blocks.push(Block::heading(first));
            if !rest.is_empty() {
                blocks.push(Block::paragraph(rest));
            }
            return;
        }

        if self.looks_like_title(paragraph) {
            blocks.push(Block::title(paragraph));
            return;
        }

        blocks.push(Block::paragraph(paragraph));
    }

    fn looks_like_title(&self, paragraph: &str) -> bool {
        paragraph.chars().count() < self.options.title_max_len
            && paragraph == paragraph.to_uppercase()
            && !paragraph.contains(':')
    }
}

/// Infer a document from raw text with default options.
pub fn infer(raw: &str) -> Document {
    StructureInferencer::default().infer(raw)
}

/// Split text into trimmed, non-empty paragraphs at blank lines.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut paragraphs);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut paragraphs);

    paragraphs
}

fn flush_paragraph(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let joined = current.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
    current.clear();
}
