//! jotsync — bidirectional structured-text / Markdown ↔ JSON conversion.
//!
//! Two markup dialects share one canonical interchange value
//! (`serde_json::Value` with insertion-ordered maps): a YAML-subset
//! "structured text" dialect, and a Markdown-bullet dialect that is
//! rewritten to the former line by line. All transforms are pure functions
//! over strings and values; parse failures surface as [`ParseError`] with
//! 1-based positions and no panic escapes the conversion boundary.

mod convert;
mod rewrite;
mod state;
pub mod yaml;

pub use convert::{json_to_markdown, json_to_text, markdown_to_json, text_to_json};
pub use state::{AppState, EditorMode, Pane};

use crate::yaml::LoadError;

/// Error produced when pane text cannot be parsed into a JSON value.
///
/// Positions are 1-based; `None` means the engine reported no position.
/// Zero is never a final value: engine marks are 0-based and adjusted by
/// +1 whenever present, so a mark on the first line surfaces as line 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl From<LoadError> for ParseError {
    fn from(err: LoadError) -> Self {
        ParseError {
            message: err.reason,
            line: err.mark.map(|m| m.line + 1),
            column: err.mark.map(|m| m.column + 1),
        }
    }
}
