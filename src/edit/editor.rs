//! The document editor: validated edits, undo/redo and change events.

use std::ops::Range;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use super::history::{apply_patches, BlockPatch, History, HistoryOptions};
use super::{ChangeCause, EditCommand, RevisionClock, Selection};
use crate::error::{Error, Result};
use crate::model::{Alignment, Attribute, Block, BlockKind, Document};

/// Emitted to subscribers after every applied change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Revision of the document after the change
    pub revision: u64,
    /// What caused the change
    pub cause: ChangeCause,
}

/// Owns the current document and applies edits to it.
///
/// Every successful edit replaces the document with a new snapshot whose
/// revision is one higher, records an undo entry and notifies subscribers.
/// Snapshots handed out by [`Editor::snapshot`] are never mutated; the
/// editor copies on write when a snapshot is still shared.
///
/// Failed edits leave the document, the history and the revision untouched.
/// So do edits that change nothing: inserting empty text, deleting an empty
/// range or toggling over a selection with no characters returns the current
/// revision without bumping it or recording history.
#[derive(Debug)]
pub struct Editor {
    document: Arc<Document>,
    history: History,
    subscribers: Vec<Sender<ChangeEvent>>,
    clock: RevisionClock,
}

impl Editor {
    /// Create an editor with default history options.
    pub fn new(document: Document) -> Self {
        Self::with_history(document, HistoryOptions::default())
    }

    /// Create an editor with explicit history options.
    pub fn with_history(document: Document, options: HistoryOptions) -> Self {
        let clock = RevisionClock::new(document.revision());
        Self {
            document: Arc::new(document),
            history: History::new(options),
            subscribers: Vec::new(),
            clock,
        }
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A shared, immutable snapshot of the current document.
    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    /// Current revision.
    pub fn revision(&self) -> u64 {
        self.document.revision()
    }

    /// Clock tracking the latest revision, for staleness checks elsewhere.
    pub fn clock(&self) -> RevisionClock {
        self.clock.clone()
    }

    /// Subscribe to change events.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<ChangeEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Check if there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.undo_depth() > 0
    }

    /// Check if there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        self.history.redo_depth() > 0
    }

    /// Number of undoable edits.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Forget all undo and redo entries.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Insert text at a character offset.
    ///
    /// The inserted text takes the style of the character before the offset.
    /// Returns the new revision; empty text is a no-op.
    pub fn insert_text(&mut self, block: usize, offset: usize, text: &str) -> Result<u64> {
        let target = self.document.block_checked(block)?;
        check_offset(block, offset, target.char_len())?;
        if text.is_empty() {
            return Ok(self.revision());
        }

        let style = target.style_at(offset);
        let mut chars = target.styled_chars();
        chars.splice(offset..offset, text.chars().map(|c| (c, style)));

        let mut updated = target.clone();
        updated.set_styled_chars(chars);
        Ok(self.commit(replace(block, updated), ChangeCause::InsertText))
    }

    /// Delete the characters in `range`. An empty range is a no-op.
    pub fn delete_text(&mut self, block: usize, range: Range<usize>) -> Result<u64> {
        let target = self.document.block_checked(block)?;
        let len = target.char_len();
        check_offset(block, range.end, len)?;
        if range.start > range.end {
            return Err(Error::InvalidSelection(format!(
                "range {}..{} is reversed",
                range.start, range.end
            )));
        }
        if range.is_empty() {
            return Ok(self.revision());
        }

        let mut chars = target.styled_chars();
        chars.drain(range);

        let mut updated = target.clone();
        updated.set_styled_chars(chars);
        Ok(self.commit(replace(block, updated), ChangeCause::DeleteText))
    }

    /// Toggle a character attribute over a selection.
    ///
    /// If every selected character already carries the attribute it is
    /// cleared; otherwise it is set on all of them. A selection covering no
    /// characters is a no-op.
    pub fn toggle_formatting(&mut self, selection: Selection, attribute: Attribute) -> Result<u64> {
        let start = selection.start();
        let end = selection.end();
        for position in [start, end] {
            let target = self.document.block_checked(position.block)?;
            check_offset(position.block, position.offset, target.char_len())?;
        }

        let mut spans = Vec::new();
        for index in start.block..=end.block {
            let block = &self.document.blocks()[index];
            let from = if index == start.block { start.offset } else { 0 };
            let to = if index == end.block {
                end.offset
            } else {
                block.char_len()
            };
            if from < to {
                spans.push((index, from..to));
            }
        }
        if spans.is_empty() {
            log::debug!("Toggle {:?} on an empty selection ignored", attribute);
            return Ok(self.revision());
        }

        let all_set = spans.iter().all(|(index, range)| {
            self.document.blocks()[*index].styled_chars()[range.clone()]
                .iter()
                .all(|(_, style)| style.get(attribute))
        });

        let patches = spans
            .into_iter()
            .map(|(index, range)| {
                let block = &self.document.blocks()[index];
                let mut chars = block.styled_chars();
                for (_, style) in &mut chars[range] {
                    *style = style.with(attribute, !all_set);
                }
                let mut updated = block.clone();
                updated.set_styled_chars(chars);
                BlockPatch::Replace {
                    index,
                    block: updated,
                }
            })
            .collect();
        Ok(self.commit(patches, ChangeCause::ToggleFormatting))
    }

    /// Change the kind of a block. Text and styling are kept.
    pub fn set_block_kind(&mut self, block: usize, kind: BlockKind) -> Result<u64> {
        let mut updated = self.document.block_checked(block)?.clone();
        updated.kind = kind;
        Ok(self.commit(replace(block, updated), ChangeCause::SetBlockKind))
    }

    /// Change the alignment of a block.
    pub fn set_alignment(&mut self, block: usize, alignment: Alignment) -> Result<u64> {
        let mut updated = self.document.block_checked(block)?.clone();
        updated.alignment = alignment;
        Ok(self.commit(replace(block, updated), ChangeCause::SetAlignment))
    }

    /// Toggle a block into a bulleted (`ordered == false`) or numbered list.
    ///
    /// A block already of that list kind reverts to a paragraph; any other
    /// kind, including the other list kind, becomes the requested one.
    pub fn toggle_list_kind(&mut self, block: usize, ordered: bool) -> Result<u64> {
        let target_kind = if ordered {
            BlockKind::OrderedListItem
        } else {
            BlockKind::ListItem
        };

        let mut updated = self.document.block_checked(block)?.clone();
        updated.kind = if updated.kind == target_kind {
            BlockKind::Paragraph
        } else {
            target_kind
        };
        Ok(self.commit(replace(block, updated), ChangeCause::ToggleListKind))
    }

    /// Split a block in two at a character offset.
    ///
    /// List items continue as list items of the same kind; the tail of any
    /// other block becomes a paragraph.
    pub fn split_block(&mut self, block: usize, offset: usize) -> Result<u64> {
        let target = self.document.block_checked(block)?;
        check_offset(block, offset, target.char_len())?;

        let mut chars = target.styled_chars();
        let tail_chars = chars.split_off(offset);

        let mut head = target.clone();
        head.set_styled_chars(chars);

        let tail_kind = if target.kind.is_list() {
            target.kind
        } else {
            BlockKind::Paragraph
        };
        let mut tail = Block::new(tail_kind).aligned(target.alignment);
        tail.set_styled_chars(tail_chars);

        let patches = vec![
            BlockPatch::Replace {
                index: block,
                block: head,
            },
            BlockPatch::Insert {
                index: block + 1,
                block: tail,
            },
        ];
        Ok(self.commit(patches, ChangeCause::SplitBlock))
    }

    /// Append the next block's text to this block and remove the next block.
    ///
    /// The merged block keeps this block's kind and alignment.
    pub fn merge_with_next(&mut self, block: usize) -> Result<u64> {
        let target = self.document.block_checked(block)?;
        let next = self.document.block_checked(block + 1)?;

        let mut chars = target.styled_chars();
        chars.extend(next.styled_chars());
        let mut merged = target.clone();
        merged.set_styled_chars(chars);

        let patches = vec![
            BlockPatch::Replace {
                index: block,
                block: merged,
            },
            BlockPatch::Remove { index: block + 1 },
        ];
        Ok(self.commit(patches, ChangeCause::MergeBlocks))
    }

    /// Revert the most recent edit.
    ///
    /// Returns `false` without changing anything when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(patches) = self.history.pop_undo() else {
            return false;
        };
        let redo = self.apply_raw(patches, ChangeCause::Undo);
        self.history.push_redo(redo);
        true
    }

    /// Re-apply the most recently undone edit.
    ///
    /// Returns `false` without changing anything when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(patches) = self.history.pop_redo() else {
            return false;
        };
        let undo = self.apply_raw(patches, ChangeCause::Redo);
        self.history.push_undo(undo);
        true
    }

    /// Apply an edit command. Returns the revision after the command.
    pub fn apply(&mut self, command: EditCommand) -> Result<u64> {
        match command {
            EditCommand::InsertText {
                block,
                offset,
                text,
            } => self.insert_text(block, offset, &text),
            EditCommand::DeleteText { block, start, end } => self.delete_text(block, start..end),
            EditCommand::ToggleFormatting {
                selection,
                attribute,
            } => self.toggle_formatting(selection, attribute),
            EditCommand::SetBlockKind { block, kind } => self.set_block_kind(block, kind),
            EditCommand::SetAlignment { block, alignment } => self.set_alignment(block, alignment),
            EditCommand::ToggleListKind { block, ordered } => {
                self.toggle_list_kind(block, ordered)
            }
            EditCommand::SplitBlock { block, offset } => self.split_block(block, offset),
            EditCommand::MergeWithNext { block } => self.merge_with_next(block),
            EditCommand::Undo => {
                self.undo();
                Ok(self.revision())
            }
            EditCommand::Redo => {
                self.redo();
                Ok(self.revision())
            }
        }
    }

    /// Consume the editor, returning the current document.
    pub fn into_document(self) -> Document {
        Arc::try_unwrap(self.document).unwrap_or_else(|shared| (*shared).clone())
    }

    fn commit(&mut self, patches: Vec<BlockPatch>, cause: ChangeCause) -> u64 {
        let inverse = self.apply_raw(patches, cause);
        self.history.record(inverse);
        self.revision()
    }

    fn apply_raw(&mut self, patches: Vec<BlockPatch>, cause: ChangeCause) -> Vec<BlockPatch> {
        let document = Arc::make_mut(&mut self.document);
        let inverse = apply_patches(patches, document.blocks_mut());
        let revision = document.bump_revision();

        log::debug!("Revision {} ({:?})", revision, cause);
        self.clock.publish(revision);
        self.publish(ChangeEvent { revision, cause });
        inverse
    }

    fn publish(&mut self, event: ChangeEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

fn replace(index: usize, block: Block) -> Vec<BlockPatch> {
    vec![BlockPatch::Replace { index, block }]
}

fn check_offset(block: usize, offset: usize, len: usize) -> Result<()> {
    if offset > len {
        return Err(Error::OffsetOutOfRange { block, offset, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Position;
    use crate::model::{TextRun, TextStyle};

    fn editor(blocks: Vec<Block>) -> Editor {
        Editor::new(Document::from_blocks(blocks))
    }

    #[test]
    fn test_insert_text_bumps_revision() {
        let mut editor = editor(vec![Block::paragraph("Hello")]);
        let revision = editor.insert_text(0, 5, " world").unwrap();

        assert_eq!(revision, 1);
        assert_eq!(editor.document().blocks()[0].plain_text(), "Hello world");
    }

    #[test]
    fn test_insert_inherits_style() {
        let mut block = Block::new(BlockKind::Paragraph);
        block.push_run(TextRun::bold("Go"));
        let mut editor = editor(vec![block]);

        editor.insert_text(0, 2, "lang").unwrap();
        assert_eq!(editor.document().blocks()[0].runs, vec![TextRun::bold("Golang")]);
    }

    #[test]
    fn test_insert_out_of_range_leaves_document() {
        let mut editor = editor(vec![Block::paragraph("abc")]);

        let err = editor.insert_text(0, 10, "x").unwrap_err();
        assert!(matches!(
            err,
            Error::OffsetOutOfRange {
                block: 0,
                offset: 10,
                len: 3
            }
        ));
        let err = editor.insert_text(4, 0, "x").unwrap_err();
        assert!(matches!(err, Error::BlockOutOfRange(4, 1)));

        assert_eq!(editor.revision(), 0);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_insert_counts_characters_not_bytes() {
        let mut editor = editor(vec![Block::paragraph("Zoë")]);
        editor.insert_text(0, 3, "!").unwrap();
        assert_eq!(editor.document().blocks()[0].plain_text(), "Zoë!");
    }

    #[test]
    fn test_delete_text() {
        let mut editor = editor(vec![Block::paragraph("Hello world")]);
        editor.delete_text(0, 5..11).unwrap();
        assert_eq!(editor.document().blocks()[0].plain_text(), "Hello");

        assert!(editor.delete_text(0, 3..9).is_err());
        assert!(editor.delete_text(0, 4..2).is_err());
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn test_toggle_bold_sets_then_clears() {
        let mut editor = editor(vec![Block::paragraph("Hello world")]);
        let selection = Selection::within(0, 0..5);

        editor.toggle_formatting(selection, Attribute::Bold).unwrap();
        assert_eq!(
            editor.document().blocks()[0].runs,
            vec![TextRun::bold("Hello"), TextRun::new(" world")]
        );

        editor.toggle_formatting(selection, Attribute::Bold).unwrap();
        assert_eq!(
            editor.document().blocks()[0].runs,
            vec![TextRun::new("Hello world")]
        );
        assert_eq!(editor.revision(), 2);
    }

    #[test]
    fn test_toggle_mixed_selection_sets_everywhere() {
        let mut block = Block::new(BlockKind::Paragraph);
        block.push_run(TextRun::italic("ab"));
        block.push_run(TextRun::new("cd"));
        let mut editor = editor(vec![block]);

        editor
            .toggle_formatting(Selection::within(0, 0..4), Attribute::Italic)
            .unwrap();
        assert_eq!(editor.document().blocks()[0].runs, vec![TextRun::italic("abcd")]);
    }

    #[test]
    fn test_toggle_across_blocks() {
        let mut editor = editor(vec![
            Block::paragraph("first"),
            Block::paragraph("middle"),
            Block::paragraph("last"),
        ]);
        let selection = Selection::new(Position::new(2, 2), Position::new(0, 3));
        editor.toggle_formatting(selection, Attribute::Underline).unwrap();

        let underline = TextStyle::default().with(Attribute::Underline, true);
        let blocks = editor.document().blocks();
        assert_eq!(
            blocks[0].runs,
            vec![TextRun::new("fir"), TextRun::styled("st", underline)]
        );
        assert_eq!(blocks[1].runs, vec![TextRun::styled("middle", underline)]);
        assert_eq!(
            blocks[2].runs,
            vec![TextRun::styled("la", underline), TextRun::new("st")]
        );

        assert!(editor.undo());
        assert_eq!(editor.document().blocks()[1].runs, vec![TextRun::new("middle")]);
    }

    #[test]
    fn test_empty_insert_and_delete_keep_revision() {
        let mut editor = editor(vec![Block::paragraph("Go")]);
        let events = editor.subscribe();

        assert_eq!(editor.insert_text(0, 1, "").unwrap(), 0);
        assert_eq!(editor.delete_text(0, 1..1).unwrap(), 0);
        assert_eq!(editor.revision(), 0);
        assert!(!editor.can_undo());
        assert_eq!(events.try_iter().count(), 0);
    }

    #[test]
    fn test_toggle_collapsed_selection_is_noop() {
        let mut editor = editor(vec![Block::paragraph("abc")]);
        let revision = editor
            .toggle_formatting(Selection::caret(Position::new(0, 1)), Attribute::Bold)
            .unwrap();
        assert_eq!(revision, 0);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_toggle_list_kind() {
        let mut editor = editor(vec![Block::paragraph("item")]);

        editor.toggle_list_kind(0, false).unwrap();
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::ListItem);
        editor.toggle_list_kind(0, true).unwrap();
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::OrderedListItem);
        editor.toggle_list_kind(0, true).unwrap();
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_set_kind_and_alignment() {
        let mut editor = editor(vec![Block::paragraph("Acme")]);
        editor.set_block_kind(0, BlockKind::Subheading).unwrap();
        editor.set_alignment(0, Alignment::Right).unwrap();

        let block = &editor.document().blocks()[0];
        assert_eq!(block.kind, BlockKind::Subheading);
        assert_eq!(block.alignment, Alignment::Right);
        assert_eq!(block.plain_text(), "Acme");
    }

    #[test]
    fn test_split_and_merge() {
        let mut editor = editor(vec![Block::heading("SKILLS Rust")]);
        editor.split_block(0, 6).unwrap();
        {
            let blocks = editor.document().blocks();
            assert_eq!(blocks.len(), 2);
            assert_eq!(blocks[0].plain_text(), "SKILLS");
            assert_eq!(blocks[1].plain_text(), " Rust");
            assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        }

        editor.merge_with_next(0).unwrap();
        assert_eq!(editor.document().blocks(), &[Block::heading("SKILLS Rust")]);
        assert!(matches!(
            editor.merge_with_next(0),
            Err(Error::BlockOutOfRange(1, 1))
        ));
    }

    #[test]
    fn test_split_list_item_continues_list() {
        let mut editor = editor(vec![Block::with_text(BlockKind::ListItem, "onetwo")]);
        editor.split_block(0, 3).unwrap();
        assert_eq!(editor.document().blocks()[1].kind, BlockKind::ListItem);
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = editor(vec![Block::paragraph("a")]);
        let original = editor.document().clone();

        editor.insert_text(0, 1, "b").unwrap();
        let edited = editor.document().blocks().to_vec();

        assert!(editor.undo());
        assert_eq!(editor.document().blocks(), original.blocks());
        assert_eq!(editor.revision(), 2);

        assert!(editor.redo());
        assert_eq!(editor.document().blocks(), edited.as_slice());
        assert_eq!(editor.revision(), 3);

        assert!(!editor.redo());
        assert_eq!(editor.revision(), 3);
    }

    fn assert_undo_redo_undo(editor: &mut Editor, edit: impl FnOnce(&mut Editor) -> Result<u64>) {
        let before = editor.document().blocks().to_vec();
        edit(editor).unwrap();
        let after = editor.document().blocks().to_vec();

        assert!(editor.undo());
        assert_eq!(editor.document().blocks(), before.as_slice());
        assert!(editor.redo());
        assert_eq!(editor.document().blocks(), after.as_slice());
        assert!(editor.undo());
        assert_eq!(editor.document().blocks(), before.as_slice());
    }

    #[test]
    fn test_undo_redo_undo_restores_prior_document() {
        let mut editor = editor(vec![
            Block::paragraph("Rust engineer"),
            Block::paragraph("Built caches"),
        ]);
        let start = editor.revision();

        assert_undo_redo_undo(&mut editor, |e| {
            e.toggle_formatting(
                Selection::new(Position::new(0, 5), Position::new(1, 5)),
                Attribute::Bold,
            )
        });
        assert_undo_redo_undo(&mut editor, |e| e.split_block(0, 4));
        assert_undo_redo_undo(&mut editor, |e| e.merge_with_next(0));
        assert_undo_redo_undo(&mut editor, |e| e.insert_text(1, 0, "Designed and "));

        assert_eq!(editor.revision(), start + 16);
        assert!(editor.can_redo());
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut editor = Editor::default();
        assert!(!editor.undo());
        assert!(!editor.redo());
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_new_edit_discards_redo() {
        let mut editor = editor(vec![Block::paragraph("a")]);
        editor.insert_text(0, 1, "b").unwrap();
        editor.undo();
        assert!(editor.can_redo());

        editor.insert_text(0, 0, "z").unwrap();
        assert!(!editor.can_redo());
        assert!(!editor.redo());
    }

    #[test]
    fn test_history_depth_limit() {
        let mut editor =
            Editor::with_history(Document::new(), HistoryOptions::new().with_max_depth(3));
        for _ in 0..5 {
            editor.insert_text(0, 0, "x").unwrap();
        }
        assert_eq!(editor.undo_depth(), 3);

        while editor.undo() {}
        assert_eq!(editor.document().blocks()[0].plain_text(), "xx");
    }

    #[test]
    fn test_snapshot_is_immutable() {
        let mut editor = editor(vec![Block::paragraph("a")]);
        let snapshot = editor.snapshot();

        editor.insert_text(0, 1, "b").unwrap();
        assert_eq!(snapshot.blocks()[0].plain_text(), "a");
        assert_eq!(snapshot.revision(), 0);
        assert_eq!(editor.document().blocks()[0].plain_text(), "ab");
    }

    #[test]
    fn test_change_events() {
        let mut editor = editor(vec![Block::paragraph("a")]);
        let events = editor.subscribe();
        let dropped = editor.subscribe();
        drop(dropped);

        editor.insert_text(0, 0, "x").unwrap();
        editor.undo();
        let _ = editor.insert_text(9, 0, "x");

        let received: Vec<ChangeEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ChangeEvent {
                    revision: 1,
                    cause: ChangeCause::InsertText
                },
                ChangeEvent {
                    revision: 2,
                    cause: ChangeCause::Undo
                },
            ]
        );
        assert_eq!(editor.subscribers.len(), 1);
        assert_eq!(editor.clock().latest(), 2);
    }

    #[test]
    fn test_apply_commands() {
        let mut editor = editor(vec![Block::paragraph("Rust")]);
        let commands = EditCommand::parse_script(
            r#"[
                {"op": "split_block", "block": 0, "offset": 2},
                {"op": "toggle_list_kind", "block": 1, "ordered": false},
                {"op": "undo"}
            ]"#,
        )
        .unwrap();

        for command in commands {
            editor.apply(command).unwrap();
        }
        let blocks = editor.document().blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(editor.revision(), 3);
    }
}
