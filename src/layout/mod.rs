//! Pagination: wrapping blocks into lines and placing lines on pages.
//!
//! Lines are wrapped greedily to the usable page width, then stacked from the
//! top margin with `y` as the baseline. A line is placed while its baseline
//! stays within the bottom margin; otherwise it starts the next page. Lines
//! are never split across pages.

mod measure;
mod paginate;
mod wrap;

pub use measure::{AverageCharWidth, TextMeasure, DEFAULT_CHAR_WIDTH_RATIO};
pub use paginate::{paginate, Paginator};
