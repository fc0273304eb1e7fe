//! Error types for cvpress.

use std::io;
use thiserror::Error;

/// Result type alias for cvpress operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while structuring, editing or exporting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input text or writing export files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Block index is out of range.
    #[error("Block {0} is out of range (document has {1} blocks)")]
    BlockOutOfRange(usize, usize),

    /// Character offset is out of range for a block.
    #[error("Offset {offset} is out of range for block {block} (length {len})")]
    OffsetOutOfRange {
        /// Block index
        block: usize,
        /// Requested character offset
        offset: usize,
        /// Character length of the block
        len: usize,
    },

    /// A selection or range whose endpoints cannot be ordered.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A layout or export was superseded by a newer document revision.
    #[error("Stale result for revision {requested} (current revision is {current})")]
    StaleResult {
        /// Revision the computation was started for
        requested: u64,
        /// Latest revision at the time the staleness was detected
        current: u64,
    },

    /// An edit script could not be parsed.
    #[error("Invalid edit command: {0}")]
    Command(String),

    /// The page geometry cannot hold any text.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// The section vocabulary could not be loaded.
    #[error("Section vocabulary error: {0}")]
    Vocabulary(String),

    /// The keyword matcher could not be built.
    #[error("Keyword matcher error: {0}")]
    Keyword(String),

    /// Error during serialization (PDF, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Check whether this error rejects an edit for referencing an invalid
    /// block index or text offset.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Error::BlockOutOfRange(..) | Error::OffsetOutOfRange { .. }
        )
    }

    /// Check whether this error marks a result superseded by a newer revision.
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleResult { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
