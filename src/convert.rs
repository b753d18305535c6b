//! The four core conversions between pane text and JSON values. All of
//! them are pure functions; the parsing pair returns structured errors and
//! the serializing pair is best-effort and cannot fail.

use serde_json::{Map, Value};

use crate::rewrite;
use crate::yaml::{self, DumpOptions};
use crate::ParseError;

/// Parses structured text into a JSON value.
///
/// Empty or all-whitespace input is valid and denotes the empty object.
/// Engine positions are 0-based and adjusted to 1-based here; an error
/// never carries a zero position.
pub fn text_to_json(text: &str) -> Result<Value, ParseError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    yaml::load(text).map_err(ParseError::from)
}

/// Serializes a JSON value into canonical structured text: 2-space
/// indentation, no line wrapping, no anchor references, double quotes
/// where a scalar requires quoting.
pub fn json_to_text(json: &Value) -> String {
    yaml::dump(json, &DumpOptions::default())
}

/// Parses Markdown-bullet text into a JSON value by first rewriting
/// bullets, headings, and bold keys into structured text, then parsing as
/// [`text_to_json`] does. Error positions refer to the rewritten lines,
/// which line up one-to-one with the input.
pub fn markdown_to_json(text: &str) -> Result<Value, ParseError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let normalized = rewrite::markdown_to_yaml(text);
    yaml::load(&normalized).map_err(ParseError::from)
}

/// Serializes a JSON value into Markdown-bullet text: the structured-text
/// rendering with dashes turned into bullets and line-leading keys bolded.
pub fn json_to_markdown(json: &Value) -> String {
    rewrite::yaml_to_markdown(&json_to_text(json))
}
