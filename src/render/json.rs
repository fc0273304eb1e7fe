//! JSON export of paginated layouts.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Layout;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a layout to JSON.
pub fn to_json(layout: &Layout, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(layout)?,
        JsonFormat::Compact => serde_json::to_string(layout)?,
    };
    Ok(json)
}
