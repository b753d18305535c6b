//! Explicit application state for a two-pane editor session, with pure
//! reducer-style transitions. The surrounding shell owns an [`AppState`]
//! and feeds edits through the transition methods; the core transforms
//! never see or retain that state.

use serde_json::{Map, Value};

use crate::convert;
use crate::ParseError;

/// Which markup dialect the text pane speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Yaml,
    Markdown,
}

/// Which pane the user touched last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Text,
    Json,
}

/// The whole editor session: both pane contents, the active dialect, the
/// last-edited pane, and the current parse error if any. On a failed edit
/// the opposite pane keeps its last-known-good content.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub text: String,
    pub json: String,
    pub mode: EditorMode,
    pub last_edited: Pane,
    pub error: Option<ParseError>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            text: String::new(),
            json: "{}".to_string(),
            mode: EditorMode::default(),
            last_edited: Pane::default(),
            error: None,
        }
    }
}

impl AppState {
    /// The text pane changed: reparse it in the active dialect. On success
    /// the JSON pane is re-rendered and any error cleared; on failure the
    /// JSON pane is left untouched and the error recorded.
    pub fn on_text_edited(mut self, new_text: &str) -> Self {
        self.text = new_text.to_string();
        self.last_edited = Pane::Text;
        match parse(self.mode, new_text) {
            Ok(value) => {
                self.json = serde_json::to_string_pretty(&value).unwrap_or_default();
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// The JSON pane changed: reparse it as JSON. Empty input denotes the
    /// empty object, mirroring the text pane's empty-input rule. On
    /// success the text pane is re-rendered in the active dialect; on
    /// failure it is left untouched and the error recorded.
    pub fn on_json_edited(mut self, new_json: &str) -> Self {
        self.json = new_json.to_string();
        self.last_edited = Pane::Json;
        if new_json.trim().is_empty() {
            self.text = render(self.mode, &Value::Object(Map::new()));
            self.error = None;
            return self;
        }
        match serde_json::from_str::<Value>(new_json) {
            Ok(value) => {
                self.text = render(self.mode, &value);
                self.error = None;
            }
            Err(err) => self.error = Some(json_error(&err)),
        }
        self
    }

    /// Switches dialect. When the JSON pane parses, the text pane is
    /// re-rendered in the new dialect; otherwise only the mode flips and
    /// both panes stay as they are.
    pub fn on_mode_toggled(mut self) -> Self {
        self.mode = match self.mode {
            EditorMode::Yaml => EditorMode::Markdown,
            EditorMode::Markdown => EditorMode::Yaml,
        };
        if let Ok(value) = serde_json::from_str::<Value>(&self.json) {
            self.text = render(self.mode, &value);
            self.error = None;
        }
        self
    }

    /// Resets both panes, keeping the dialect selection.
    pub fn on_clear(self) -> Self {
        AppState {
            mode: self.mode,
            ..AppState::default()
        }
    }
}

fn parse(mode: EditorMode, text: &str) -> Result<Value, ParseError> {
    match mode {
        EditorMode::Yaml => convert::text_to_json(text),
        EditorMode::Markdown => convert::markdown_to_json(text),
    }
}

fn render(mode: EditorMode, value: &Value) -> String {
    match mode {
        EditorMode::Yaml => convert::json_to_text(value),
        EditorMode::Markdown => convert::json_to_markdown(value),
    }
}

/// serde_json reports 1-based positions already; zero means it had none.
fn json_error(err: &serde_json::Error) -> ParseError {
    ParseError {
        message: err.to_string(),
        line: (err.line() > 0).then(|| err.line()),
        column: (err.column() > 0).then(|| err.column()),
    }
}
