//! Serializable edit commands.

use serde::{Deserialize, Serialize};

use super::Selection;
use crate::model::{Alignment, Attribute, BlockKind};

/// What caused a document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    InsertText,
    DeleteText,
    ToggleFormatting,
    SetBlockKind,
    SetAlignment,
    ToggleListKind,
    SplitBlock,
    MergeBlocks,
    Undo,
    Redo,
}

/// A single editor operation as data.
///
/// Commands can be replayed from a script file; see [`Editor::apply`].
///
/// [`Editor::apply`]: super::Editor::apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    /// Insert text at a character offset
    InsertText {
        block: usize,
        offset: usize,
        text: String,
    },
    /// Delete characters `start..end`
    DeleteText {
        block: usize,
        start: usize,
        end: usize,
    },
    /// Toggle a character attribute over a selection
    ToggleFormatting {
        selection: Selection,
        attribute: Attribute,
    },
    /// Change the kind of a block
    SetBlockKind { block: usize, kind: BlockKind },
    /// Change the alignment of a block
    SetAlignment { block: usize, alignment: Alignment },
    /// Toggle a block into or out of a list
    ToggleListKind { block: usize, ordered: bool },
    /// Split a block in two at a character offset
    SplitBlock { block: usize, offset: usize },
    /// Join a block with the block after it
    MergeWithNext { block: usize },
    /// Undo the latest edit
    Undo,
    /// Redo the latest undone edit
    Redo,
}

impl EditCommand {
    /// The change cause this command reports.
    pub fn cause(&self) -> ChangeCause {
        match self {
            EditCommand::InsertText { .. } => ChangeCause::InsertText,
            EditCommand::DeleteText { .. } => ChangeCause::DeleteText,
            EditCommand::ToggleFormatting { .. } => ChangeCause::ToggleFormatting,
            EditCommand::SetBlockKind { .. } => ChangeCause::SetBlockKind,
            EditCommand::SetAlignment { .. } => ChangeCause::SetAlignment,
            EditCommand::ToggleListKind { .. } => ChangeCause::ToggleListKind,
            EditCommand::SplitBlock { .. } => ChangeCause::SplitBlock,
            EditCommand::MergeWithNext { .. } => ChangeCause::MergeBlocks,
            EditCommand::Undo => ChangeCause::Undo,
            EditCommand::Redo => ChangeCause::Redo,
        }
    }

    /// Parse a JSON array of commands.
    pub fn parse_script(json: &str) -> crate::Result<Vec<EditCommand>> {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Command(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Position;

    #[test]
    fn test_command_json_shape() {
        let json = r#"[
            {"op": "insert_text", "block": 0, "offset": 2, "text": "hi"},
            {"op": "toggle_formatting",
             "selection": {"anchor": {"block": 0, "offset": 0}, "head": {"block": 0, "offset": 2}},
             "attribute": "bold"},
            {"op": "set_block_kind", "block": 1, "kind": "subheading"},
            {"op": "undo"}
        ]"#;
        let commands = EditCommand::parse_script(json).unwrap();

        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[1],
            EditCommand::ToggleFormatting {
                selection: Selection::new(Position::new(0, 0), Position::new(0, 2)),
                attribute: Attribute::Bold,
            }
        );
        assert_eq!(commands[2].cause(), ChangeCause::SetBlockKind);
        assert_eq!(commands[3], EditCommand::Undo);
    }

    #[test]
    fn test_bad_script() {
        assert!(EditCommand::parse_script(r#"[{"op": "explode"}]"#).is_err());
    }
}
