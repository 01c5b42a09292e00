//! Tunable limits for the extraction engines

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of lines a body may have before it is passed
/// through untouched
pub const MAX_LINES_COUNT: usize = 1000;

/// Longest splitter window (and plain body, for the date header fix-up)
/// that regexes are run against
pub const MAX_LINE_LENGTH: usize = 200_000;

/// Number of lines a single splitter may span
pub const SPLITTER_MAX_LINES: usize = 4;

/// Chunk size used when scanning for the line delimiter
pub const CONTENT_CHUNK_SIZE: usize = 100;

/// Deepest element nesting an HTML body may have before it is passed
/// through untouched
pub const MAX_NESTING_DEPTH: usize = 256;

/// Limits applied by [`crate::Extractor`]
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use email_reply_extract::ExtractOptions;
///
/// let options = ExtractOptions::from_json(r#"{"max_lines_count": 50}"#).unwrap();
/// assert_eq!(options.max_lines_count, 50);
/// assert_eq!(options.splitter_max_lines, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Bodies with more lines than this are returned unchanged
    pub max_lines_count: usize,

    /// Splitter windows longer than this are never treated as splitters
    pub max_line_length: usize,

    /// How many consecutive lines a splitter pattern may cover
    pub splitter_max_lines: usize,

    /// Size of the chunks scanned by the delimiter detector
    pub delimiter_chunk_size: usize,

    /// HTML documents nested deeper than this are returned unchanged
    pub max_nesting_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_lines_count: MAX_LINES_COUNT,
            max_line_length: MAX_LINE_LENGTH,
            splitter_max_lines: SPLITTER_MAX_LINES,
            delimiter_chunk_size: CONTENT_CHUNK_SIZE,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl ExtractOptions {
    /// Read options from a JSON object, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
