//! Invertible block patches and the bounded undo/redo stack.

use std::collections::VecDeque;

use crate::model::Block;

/// Default number of undoable edits kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// A structural change to the block list.
///
/// Applying a patch returns the patch that reverts it, so every recorded
/// edit can be undone and redone exactly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BlockPatch {
    /// Replace the block at `index`
    Replace { index: usize, block: Block },
    /// Insert a block before `index`
    Insert { index: usize, block: Block },
    /// Remove the block at `index`
    Remove { index: usize },
}

impl BlockPatch {
    /// Apply the patch and return its inverse.
    ///
    /// Patches are only built against validated indices.
    pub(crate) fn apply(self, blocks: &mut Vec<Block>) -> BlockPatch {
        match self {
            BlockPatch::Replace { index, block } => {
                let previous = std::mem::replace(&mut blocks[index], block);
                BlockPatch::Replace {
                    index,
                    block: previous,
                }
            }
            BlockPatch::Insert { index, block } => {
                blocks.insert(index, block);
                BlockPatch::Remove { index }
            }
            BlockPatch::Remove { index } => {
                let block = blocks.remove(index);
                BlockPatch::Insert { index, block }
            }
        }
    }
}

/// Apply patches in order; returns the inverse sequence, ready to apply.
pub(crate) fn apply_patches(patches: Vec<BlockPatch>, blocks: &mut Vec<Block>) -> Vec<BlockPatch> {
    let mut inverse: Vec<BlockPatch> = patches.into_iter().map(|p| p.apply(blocks)).collect();
    inverse.reverse();
    inverse
}

/// Options for the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Maximum number of undoable edits; the oldest is dropped beyond this
    pub max_depth: usize,
}

impl HistoryOptions {
    /// Create history options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Bounded undo/redo stacks of patch sequences.
#[derive(Debug, Clone)]
pub(crate) struct History {
    undo: VecDeque<Vec<BlockPatch>>,
    redo: Vec<Vec<BlockPatch>>,
    max_depth: usize,
}

impl History {
    pub(crate) fn new(options: HistoryOptions) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: options.max_depth,
        }
    }

    /// Record the inverse of a fresh edit. Invalidates the redo stack.
    pub(crate) fn record(&mut self, inverse: Vec<BlockPatch>) {
        self.redo.clear();
        self.push_undo(inverse);
    }

    /// Push onto the undo stack without touching redo.
    pub(crate) fn push_undo(&mut self, patches: Vec<BlockPatch>) {
        if self.max_depth == 0 {
            return;
        }
        self.undo.push_back(patches);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Vec<BlockPatch>> {
        self.undo.pop_back()
    }

    pub(crate) fn push_redo(&mut self, patches: Vec<BlockPatch>) {
        self.redo.push(patches);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Vec<BlockPatch>> {
        self.redo.pop()
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_inverse_roundtrip() {
        let original = vec![Block::paragraph("a"), Block::paragraph("b")];
        let mut blocks = original.clone();

        let inverse = apply_patches(
            vec![
                BlockPatch::Replace {
                    index: 0,
                    block: Block::heading("A"),
                },
                BlockPatch::Insert {
                    index: 1,
                    block: Block::paragraph("new"),
                },
                BlockPatch::Remove { index: 2 },
            ],
            &mut blocks,
        );
        assert_eq!(
            blocks,
            vec![Block::heading("A"), Block::paragraph("new")]
        );

        apply_patches(inverse, &mut blocks);
        assert_eq!(blocks, original);
    }

    #[test]
    fn test_history_bounded() {
        let mut history = History::new(HistoryOptions::new().with_max_depth(2));
        for i in 0..3 {
            history.record(vec![BlockPatch::Remove { index: i }]);
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(
            history.pop_undo(),
            Some(vec![BlockPatch::Remove { index: 2 }])
        );
        assert_eq!(
            history.pop_undo(),
            Some(vec![BlockPatch::Remove { index: 1 }])
        );
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(HistoryOptions::default());
        history.push_redo(vec![BlockPatch::Remove { index: 0 }]);
        assert_eq!(history.redo_depth(), 1);
        history.record(vec![BlockPatch::Remove { index: 0 }]);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_zero_depth_disables_undo() {
        let mut history = History::new(HistoryOptions::new().with_max_depth(0));
        history.record(vec![BlockPatch::Remove { index: 0 }]);
        assert_eq!(history.undo_depth(), 0);
    }
}
