//! Caret positions and selections.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A caret position: block index plus character offset within the block.
///
/// Positions order by block first, then offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Block index
    pub block: usize,
    /// Character offset within the block
    pub offset: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A selection between two positions, possibly spanning blocks.
///
/// The anchor may come after the head (selection made backwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// Where the selection ends (the caret)
    pub head: Position,
}

impl Selection {
    /// Create a selection from anchor to head.
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection at one position.
    pub fn caret(position: Position) -> Self {
        Self::new(position, position)
    }

    /// A selection of a character range inside one block.
    pub fn within(block: usize, range: Range<usize>) -> Self {
        Self::new(
            Position::new(block, range.start),
            Position::new(block, range.end),
        )
    }

    /// The earlier endpoint.
    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// The later endpoint.
    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// Check if the selection is empty.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }
}
