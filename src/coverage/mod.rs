//! Keyword coverage tracking.
//!
//! Coverage is a pure function of the document's flattened text and a fixed
//! keyword set: a keyword is present when it occurs, case-insensitively, as a
//! substring. [`CoverageTracker`] recomputes it per revision and reports the
//! keywords that appeared or disappeared since the last one.

mod keywords;
mod matcher;
mod tracker;

pub use keywords::KeywordSet;
pub use matcher::{KeywordMatcher, MatchStrategy, MULTI_PATTERN_THRESHOLD};
pub use tracker::{recompute, CoverageDelta, CoverageState, CoverageTracker};
