//! Document editing with undo/redo.
//!
//! The [`Editor`] owns the current [`Document`](crate::model::Document) and
//! applies validated edits to it. Each edit is recorded as a sequence of
//! invertible block patches, so undo and redo restore snapshots exactly
//! without keeping whole copies of the document.

mod clock;
mod command;
mod editor;
mod history;
mod selection;

pub use clock::RevisionClock;
pub use command::{ChangeCause, EditCommand};
pub use editor::{ChangeEvent, Editor};
pub use history::{HistoryOptions, DEFAULT_HISTORY_DEPTH};
pub use selection::{Position, Selection};
