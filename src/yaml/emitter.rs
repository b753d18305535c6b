use serde_json::{Map, Value};

use super::parser::resolve_plain;

/// Style used when a string scalar requires quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

/// Serialization options. Line wrapping and alias emission do not exist in
/// this dialect, so the surface is the indentation width and the quoting
/// style; the defaults are the canonical pane rendering.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub indent: usize,
    pub quote: QuoteStyle,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            indent: 2,
            quote: QuoteStyle::Double,
        }
    }
}

/// Serializes a JSON value into structured text.
///
/// Nested values are always treated as independent trees: no anchors or
/// references are ever emitted, and lines are never wrapped. Emission
/// cannot fail; the output always ends with a newline.
pub fn dump(value: &Value, opts: &DumpOptions) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}\n"),
        Value::Array(items) if items.is_empty() => out.push_str("[]\n"),
        Value::Object(map) => write_mapping(&mut out, map, "", false, opts),
        Value::Array(items) => write_sequence(&mut out, items, "", false, opts),
        scalar => {
            out.push_str(&scalar_text(scalar, opts));
            out.push('\n');
        }
    }
    out
}

fn write_mapping(
    out: &mut String,
    map: &Map<String, Value>,
    prefix: &str,
    inline_first: bool,
    opts: &DumpOptions,
) {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 || !inline_first {
            out.push_str(prefix);
        }
        out.push_str(&string_scalar(key, opts));
        out.push(':');
        match value {
            Value::Object(m) if m.is_empty() => out.push_str(" {}\n"),
            Value::Array(a) if a.is_empty() => out.push_str(" []\n"),
            Value::Object(m) => {
                out.push('\n');
                let child = format!("{prefix}{}", " ".repeat(opts.indent));
                write_mapping(out, m, &child, false, opts);
            }
            Value::Array(a) => {
                out.push('\n');
                let child = format!("{prefix}{}", " ".repeat(opts.indent));
                write_sequence(out, a, &child, false, opts);
            }
            scalar => {
                out.push(' ');
                out.push_str(&scalar_text(scalar, opts));
                out.push('\n');
            }
        }
    }
}

fn write_sequence(
    out: &mut String,
    items: &[Value],
    prefix: &str,
    inline_first: bool,
    opts: &DumpOptions,
) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 || !inline_first {
            out.push_str(prefix);
        }
        match item {
            Value::Object(m) if m.is_empty() => out.push_str("- {}\n"),
            Value::Array(a) if a.is_empty() => out.push_str("- []\n"),
            // compact form: the first line of the nested block sits on the
            // dash line, continuation lines align under it
            Value::Object(m) => {
                out.push_str("- ");
                let child = format!("{prefix}  ");
                write_mapping(out, m, &child, true, opts);
            }
            Value::Array(a) => {
                out.push_str("- ");
                let child = format!("{prefix}  ");
                write_sequence(out, a, &child, true, opts);
            }
            scalar => {
                out.push_str("- ");
                out.push_str(&scalar_text(scalar, opts));
                out.push('\n');
            }
        }
    }
}

fn scalar_text(value: &Value, opts: &DumpOptions) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_scalar(s, opts),
        // containers are handled by the block writers; fall back to JSON
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn string_scalar(s: &str, opts: &DumpOptions) -> String {
    if !needs_quotes(s) {
        return s.to_string();
    }
    match opts.quote {
        QuoteStyle::Double => quote_double(s),
        // single quotes cannot escape control characters
        QuoteStyle::Single if s.chars().any(char::is_control) => quote_double(s),
        QuoteStyle::Single => format!("'{}'", s.replace('\'', "''")),
    }
}

/// A string is written plain only when the parser would read it back
/// verbatim as a string scalar.
fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if first.is_whitespace() || s.ends_with(char::is_whitespace) {
        return true;
    }
    if matches!(
        first,
        '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
            | ','
    ) {
        return true;
    }
    if matches!(first, '-' | '?')
        && matches!(s.chars().nth(1), None | Some(' ') | Some('\t'))
    {
        return true;
    }
    if s.contains(':') || s.contains(" #") {
        return true;
    }
    if s.chars().any(char::is_control) {
        return true;
    }
    !matches!(resolve_plain(s), Value::String(_))
}

fn quote_double(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
