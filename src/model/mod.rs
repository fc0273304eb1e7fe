//! Document model types for résumé content.
//!
//! This module defines the block document edited interactively and the
//! paginated representation produced for export. The document is an ordered
//! list of blocks; order is top-to-bottom flow and is never changed
//! implicitly.

mod block;
mod document;
mod geometry;
mod page;

pub use block::{Alignment, Attribute, Block, BlockKind, TextRun, TextStyle};
pub use document::Document;
pub use geometry::{KindMetrics, PageGeometry};
pub use page::{Layout, LineSpan, Page, PositionedLine};
