use serde_json::{Map, Number, Value};
use std::fmt;

/// 0-based position of a parse failure in the source text. Columns are
/// counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub line: usize,
    pub column: usize,
}

/// Structured parse failure: a human-readable reason plus an optional
/// source mark. Every error this engine produces carries a mark; the
/// `Option` is part of the collaborator contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub reason: String,
    pub mark: Option<Mark>,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if let Some(mark) = self.mark {
            write!(f, " at line {}, column {}", mark.line + 1, mark.column + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

fn err_at(reason: &str, line: usize, column: usize) -> LoadError {
    LoadError {
        reason: reason.to_string(),
        mark: Some(Mark { line, column }),
    }
}

/// Parses structured text into a JSON value.
///
/// The accepted dialect is a strict subset of YAML: block mappings and
/// sequences (including the compact `- key: value` and `- - nested` forms
/// and sequences at the same indentation as their parent key), plain and
/// quoted scalars, single-line flow collections, and comments. Anchors,
/// tags, multi-document streams, and block scalars are not part of the
/// dialect. Stricter than YAML: in a node position a colon must be followed
/// by whitespace or end of line, and tabs may not be used as indentation.
pub fn load(source: &str) -> Result<Value, LoadError> {
    let lines = scan_lines(source)?;
    if lines.is_empty() {
        return Ok(Value::Null);
    }
    let mut parser = Parser { lines, pos: 0 };
    let value = parser.parse_node()?;
    if let Some(line) = parser.peek() {
        return Err(err_at(
            "end of the stream or a document separator is expected",
            line.number,
            line.indent,
        ));
    }
    Ok(value)
}

/// A content-bearing source line: blank lines and full-line comments are
/// dropped during scanning.
#[derive(Clone, Copy)]
struct Line<'a> {
    /// Column of the first content character, in characters.
    indent: usize,
    /// The line from its first content character to its end.
    text: &'a str,
    /// 0-based line number in the original source.
    number: usize,
}

fn scan_lines(source: &str) -> Result<Vec<Line<'_>>, LoadError> {
    let mut lines = Vec::new();
    for (number, raw) in source.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let Some((start, first)) = raw.char_indices().find(|&(_, c)| c != ' ' && c != '\t') else {
            continue;
        };
        if first == '#' {
            continue;
        }
        let prefix = &raw[..start];
        if let Some(tab) = prefix.chars().position(|c| c == '\t') {
            return Err(err_at(
                "tab characters must not be used in indentation",
                number,
                tab,
            ));
        }
        lines.push(Line {
            indent: prefix.chars().count(),
            text: &raw[start..],
            number,
        });
    }
    Ok(lines)
}

fn is_sequence_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ") || text.starts_with("-\t")
}

/// What a content line opens with: a `key:` mapping entry (with the byte
/// offset of the text just past the colon) or a leaf node.
enum Shape {
    Entry { key: String, value_start: usize },
    Leaf,
}

fn line_shape(line: Line<'_>) -> Result<Shape, LoadError> {
    let text = line.text;
    if text.starts_with('[') || text.starts_with('{') {
        return Ok(Shape::Leaf);
    }
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    if text.starts_with('"') || text.starts_with('\'') {
        let (key, close) = read_quoted(&chars, 0, line)?;
        let mut i = close;
        let mut skipped = 0usize;
        while matches!(chars.get(i).map(|&(_, c)| c), Some(' ') | Some('\t')) {
            i += 1;
            skipped += 1;
        }
        return match chars.get(i).map(|&(_, c)| c) {
            None => Ok(Shape::Leaf),
            Some('#') if skipped > 0 => Ok(Shape::Leaf),
            Some(':') => match chars.get(i + 1).map(|&(_, c)| c) {
                None => Ok(Shape::Entry {
                    key,
                    value_start: text.len(),
                }),
                Some(' ') | Some('\t') => Ok(Shape::Entry {
                    key,
                    value_start: chars[i + 1].0,
                }),
                Some(_) => Err(err_at(
                    "the colon in a mapping entry must be followed by a space",
                    line.number,
                    line.indent + i,
                )),
            },
            Some(_) => Err(err_at(
                "unexpected content after a quoted scalar",
                line.number,
                line.indent + i,
            )),
        };
    }
    // Plain content: the first colon decides. Followed by whitespace or end
    // of line it is a key boundary; followed by anything else it is the
    // dialect error the editor teaches ("colon needs a trailing space").
    for (i, &(byte, c)) in chars.iter().enumerate() {
        match c {
            ':' => {
                return match chars.get(i + 1).map(|&(_, c)| c) {
                    None | Some(' ') | Some('\t') => {
                        let key = text[..byte].trim_end();
                        if key.is_empty() {
                            return Err(err_at(
                                "a mapping entry is missing its key",
                                line.number,
                                line.indent,
                            ));
                        }
                        let value_start = match chars.get(i + 1) {
                            Some(&(b, _)) => b,
                            None => text.len(),
                        };
                        Ok(Shape::Entry {
                            key: key.to_string(),
                            value_start,
                        })
                    }
                    Some(_) => Err(err_at(
                        "the colon in a mapping entry must be followed by a space",
                        line.number,
                        line.indent + i,
                    )),
                };
            }
            '#' if i > 0 && matches!(chars[i - 1].1, ' ' | '\t') => break,
            _ => {}
        }
    }
    Ok(Shape::Leaf)
}

/// Byte offset of the first character of an inline value after `from`, or
/// `None` when the rest of the line is blank or a trailing comment.
fn inline_value_start(text: &str, from: usize) -> Option<usize> {
    let rest = &text[from..];
    let (off, first) = rest.char_indices().find(|&(_, c)| c != ' ' && c != '\t')?;
    if first == '#' {
        return None;
    }
    Some(from + off)
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn parse_node(&mut self) -> Result<Value, LoadError> {
        let Some(line) = self.peek() else {
            return Ok(Value::Null);
        };
        if is_sequence_item(line.text) {
            self.parse_sequence(line.indent)
        } else {
            match line_shape(line)? {
                Shape::Entry { .. } => self.parse_mapping(line.indent),
                Shape::Leaf => {
                    let value = parse_flow_or_scalar(line, 0)?;
                    self.pos += 1;
                    Ok(value)
                }
            }
        }
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Value, LoadError> {
        let mut map = Map::new();
        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(err_at(
                    "bad indentation of a mapping entry",
                    line.number,
                    line.indent,
                ));
            }
            if is_sequence_item(line.text) {
                break;
            }
            let Shape::Entry { key, value_start } = line_shape(line)? else {
                break;
            };
            if map.contains_key(&key) {
                return Err(err_at("duplicated mapping key", line.number, line.indent));
            }
            let value = match inline_value_start(line.text, value_start) {
                Some(start) => {
                    let value = parse_flow_or_scalar(line, start)?;
                    self.pos += 1;
                    value
                }
                None => {
                    self.pos += 1;
                    match self.peek() {
                        Some(next) if next.indent > indent => self.parse_node()?,
                        Some(next) if next.indent == indent && is_sequence_item(next.text) => {
                            self.parse_sequence(indent)?
                        }
                        _ => Value::Null,
                    }
                }
            };
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Value, LoadError> {
        let mut items = Vec::new();
        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(err_at(
                    "bad indentation of a sequence entry",
                    line.number,
                    line.indent,
                ));
            }
            if !is_sequence_item(line.text) {
                break;
            }
            let after = &line.text[1..];
            let item = match after.char_indices().find(|&(_, c)| c != ' ' && c != '\t') {
                None | Some((_, '#')) => {
                    // lone dash: the item is the nested block, or null
                    self.pos += 1;
                    match self.peek() {
                        Some(next) if next.indent > indent => self.parse_node()?,
                        _ => Value::Null,
                    }
                }
                Some((off, _)) => {
                    // Re-anchor the line at the item content so compact
                    // forms (`- key: value`, `- - x`) parse as a nested
                    // block whose first line sits on the dash line.
                    let content_start = 1 + off;
                    self.lines[self.pos] = Line {
                        indent: line.indent + content_start,
                        text: &line.text[content_start..],
                        number: line.number,
                    };
                    self.parse_node()?
                }
            };
            items.push(item);
        }
        Ok(Value::Array(items))
    }
}

/// Parses the value portion of a line starting at byte offset `start`:
/// a flow collection, a quoted scalar, or a plain scalar running to the
/// end of the line or a trailing comment.
fn parse_flow_or_scalar(line: Line<'_>, start: usize) -> Result<Value, LoadError> {
    let text = line.text;
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let start_idx = chars
        .iter()
        .position(|&(b, _)| b == start)
        .unwrap_or(chars.len());
    let Some(&(_, first)) = chars.get(start_idx) else {
        return Ok(Value::Null);
    };
    match first {
        '[' | '{' => {
            let (value, next) = flow_value(text, &chars, start_idx, line)?;
            ensure_line_end(&chars, next, line)?;
            Ok(value)
        }
        '"' | '\'' => {
            let (s, next) = read_quoted(&chars, start_idx, line)?;
            ensure_line_end(&chars, next, line)?;
            Ok(Value::String(s))
        }
        '-' if matches!(
            chars.get(start_idx + 1).map(|&(_, c)| c),
            None | Some(' ') | Some('\t')
        ) =>
        {
            Err(err_at(
                "a block sequence may not appear on the same line as a mapping key",
                line.number,
                line.indent + start_idx,
            ))
        }
        _ => {
            let mut end = chars.len();
            for i in (start_idx + 1)..chars.len() {
                if chars[i].1 == '#' && matches!(chars[i - 1].1, ' ' | '\t') {
                    end = i;
                    break;
                }
            }
            let end_byte = chars.get(end).map(|&(b, _)| b).unwrap_or(text.len());
            Ok(resolve_plain(text[start..end_byte].trim_end()))
        }
    }
}

/// Only blanks and a trailing comment may follow a completed value.
fn ensure_line_end(chars: &[(usize, char)], mut i: usize, line: Line<'_>) -> Result<(), LoadError> {
    let mut skipped = 0usize;
    while matches!(chars.get(i).map(|&(_, c)| c), Some(' ') | Some('\t')) {
        i += 1;
        skipped += 1;
    }
    match chars.get(i).map(|&(_, c)| c) {
        None => Ok(()),
        Some('#') if skipped > 0 => Ok(()),
        Some(_) => Err(err_at(
            "unexpected content at the end of the line",
            line.number,
            line.indent + i,
        )),
    }
}

fn flow_eof(line: Line<'_>) -> LoadError {
    err_at(
        "unexpected end of the stream within a flow collection",
        line.number,
        line.indent + line.text.chars().count(),
    )
}

fn skip_flow_ws(chars: &[(usize, char)], mut i: usize) -> usize {
    while matches!(chars.get(i).map(|&(_, c)| c), Some(' ') | Some('\t')) {
        i += 1;
    }
    i
}

/// Parses one flow value starting at char index `i`; returns the value and
/// the char index just past it.
fn flow_value(
    text: &str,
    chars: &[(usize, char)],
    i: usize,
    line: Line<'_>,
) -> Result<(Value, usize), LoadError> {
    match chars.get(i).map(|&(_, c)| c) {
        Some('[') => flow_sequence(text, chars, i + 1, line),
        Some('{') => flow_mapping(text, chars, i + 1, line),
        Some('"') | Some('\'') => {
            let (s, next) = read_quoted(chars, i, line)?;
            Ok((Value::String(s), next))
        }
        Some(_) => {
            let mut j = i;
            while !matches!(chars.get(j).map(|&(_, c)| c), None | Some(',') | Some(']') | Some('}'))
            {
                j += 1;
            }
            let start_byte = chars[i].0;
            let end_byte = chars.get(j).map(|&(b, _)| b).unwrap_or(text.len());
            let scalar = text[start_byte..end_byte].trim();
            if scalar.is_empty() {
                return Err(err_at(
                    "expected a flow collection entry",
                    line.number,
                    line.indent + i,
                ));
            }
            Ok((resolve_plain(scalar), j))
        }
        None => Err(flow_eof(line)),
    }
}

fn flow_sequence(
    text: &str,
    chars: &[(usize, char)],
    mut i: usize,
    line: Line<'_>,
) -> Result<(Value, usize), LoadError> {
    let mut items = Vec::new();
    i = skip_flow_ws(chars, i);
    if let Some(']') = chars.get(i).map(|&(_, c)| c) {
        return Ok((Value::Array(items), i + 1));
    }
    loop {
        i = skip_flow_ws(chars, i);
        let (value, next) = flow_value(text, chars, i, line)?;
        items.push(value);
        i = skip_flow_ws(chars, next);
        match chars.get(i).map(|&(_, c)| c) {
            Some(',') => i += 1,
            Some(']') => return Ok((Value::Array(items), i + 1)),
            Some(_) => {
                return Err(err_at(
                    "expected a comma or a closing bracket in a flow sequence",
                    line.number,
                    line.indent + i,
                ));
            }
            None => return Err(flow_eof(line)),
        }
    }
}

fn flow_mapping(
    text: &str,
    chars: &[(usize, char)],
    mut i: usize,
    line: Line<'_>,
) -> Result<(Value, usize), LoadError> {
    let mut map = Map::new();
    i = skip_flow_ws(chars, i);
    if let Some('}') = chars.get(i).map(|&(_, c)| c) {
        return Ok((Value::Object(map), i + 1));
    }
    loop {
        i = skip_flow_ws(chars, i);
        let key_at = i;
        let key = match chars.get(i).map(|&(_, c)| c) {
            Some('"') | Some('\'') => {
                let (s, next) = read_quoted(chars, i, line)?;
                i = next;
                s
            }
            Some(_) => {
                let mut j = i;
                while !matches!(
                    chars.get(j).map(|&(_, c)| c),
                    None | Some(':') | Some(',') | Some('}')
                ) {
                    j += 1;
                }
                let start_byte = chars[i].0;
                let end_byte = chars.get(j).map(|&(b, _)| b).unwrap_or(text.len());
                i = j;
                text[start_byte..end_byte].trim().to_string()
            }
            None => return Err(flow_eof(line)),
        };
        i = skip_flow_ws(chars, i);
        match chars.get(i).map(|&(_, c)| c) {
            Some(':') => i += 1,
            _ => {
                return Err(err_at(
                    "expected a colon in a flow mapping entry",
                    line.number,
                    line.indent + i,
                ));
            }
        }
        i = skip_flow_ws(chars, i);
        let (value, next) = flow_value(text, chars, i, line)?;
        if map.contains_key(&key) {
            return Err(err_at("duplicated mapping key", line.number, line.indent + key_at));
        }
        map.insert(key, value);
        i = skip_flow_ws(chars, next);
        match chars.get(i).map(|&(_, c)| c) {
            Some(',') => i += 1,
            Some('}') => return Ok((Value::Object(map), i + 1)),
            Some(_) => {
                return Err(err_at(
                    "expected a comma or a closing brace in a flow mapping",
                    line.number,
                    line.indent + i,
                ));
            }
            None => return Err(flow_eof(line)),
        }
    }
}

/// Reads a quoted scalar whose opening quote sits at char index `start`;
/// returns the decoded string and the char index just past the closing
/// quote.
fn read_quoted(
    chars: &[(usize, char)],
    start: usize,
    line: Line<'_>,
) -> Result<(String, usize), LoadError> {
    let quote = chars[start].1;
    let mut out = String::new();
    let mut i = start + 1;
    if quote == '\'' {
        loop {
            match chars.get(i).map(|&(_, c)| c) {
                Some('\'') => {
                    if let Some('\'') = chars.get(i + 1).map(|&(_, c)| c) {
                        out.push('\'');
                        i += 2;
                    } else {
                        return Ok((out, i + 1));
                    }
                }
                Some(c) => {
                    out.push(c);
                    i += 1;
                }
                None => {
                    return Err(err_at(
                        "unexpected end of the stream within a single quoted scalar",
                        line.number,
                        line.indent + chars.len(),
                    ));
                }
            }
        }
    }
    loop {
        match chars.get(i).map(|&(_, c)| c) {
            Some('"') => return Ok((out, i + 1)),
            Some('\\') => {
                let (decoded, next) = read_escape(chars, i, line)?;
                out.push(decoded);
                i = next;
            }
            Some(c) => {
                out.push(c);
                i += 1;
            }
            None => {
                return Err(err_at(
                    "unexpected end of the stream within a double quoted scalar",
                    line.number,
                    line.indent + chars.len(),
                ));
            }
        }
    }
}

/// Decodes one backslash escape starting at char index `at`; returns the
/// character and the index just past the escape.
fn read_escape(
    chars: &[(usize, char)],
    at: usize,
    line: Line<'_>,
) -> Result<(char, usize), LoadError> {
    match chars.get(at + 1).map(|&(_, c)| c) {
        Some('"') => Ok(('"', at + 2)),
        Some('\\') => Ok(('\\', at + 2)),
        Some('/') => Ok(('/', at + 2)),
        Some('n') => Ok(('\n', at + 2)),
        Some('r') => Ok(('\r', at + 2)),
        Some('t') => Ok(('\t', at + 2)),
        Some('b') => Ok(('\u{08}', at + 2)),
        Some('f') => Ok(('\u{0C}', at + 2)),
        Some('0') => Ok(('\0', at + 2)),
        Some('u') => {
            let unit = read_hex4(chars, at + 2, line)?;
            if (0xD800..=0xDBFF).contains(&unit) {
                // surrogate pair: a second \uXXXX low half must follow
                if chars.get(at + 6).map(|&(_, c)| c) == Some('\\')
                    && chars.get(at + 7).map(|&(_, c)| c) == Some('u')
                {
                    let low = read_hex4(chars, at + 8, line)?;
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        if let Some(c) = char::from_u32(code) {
                            return Ok((c, at + 12));
                        }
                    }
                }
                Err(err_at(
                    "invalid Unicode escape in a double quoted scalar",
                    line.number,
                    line.indent + at,
                ))
            } else {
                match char::from_u32(unit) {
                    Some(c) => Ok((c, at + 6)),
                    None => Err(err_at(
                        "invalid Unicode escape in a double quoted scalar",
                        line.number,
                        line.indent + at,
                    )),
                }
            }
        }
        _ => Err(err_at(
            "unknown escape sequence in a double quoted scalar",
            line.number,
            line.indent + at,
        )),
    }
}

fn read_hex4(chars: &[(usize, char)], at: usize, line: Line<'_>) -> Result<u32, LoadError> {
    let mut value = 0u32;
    for k in 0..4 {
        match chars.get(at + k).map(|&(_, c)| c) {
            Some(c) if c.is_ascii_hexdigit() => {
                value = value * 16 + c.to_digit(16).unwrap_or(0);
            }
            _ => {
                return Err(err_at(
                    "expected four hexadecimal digits in a Unicode escape",
                    line.number,
                    line.indent + at + k,
                ));
            }
        }
    }
    Ok(value)
}

/// Resolves an unquoted scalar the way the core schema does: null and bool
/// forms, integers (decimal, hex, octal), floats, then a plain string.
/// Non-finite floats are not representable in JSON and stay strings.
pub(crate) fn resolve_plain(s: &str) -> Value {
    match s {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Some(n) = parse_integer(s) {
        return Value::Number(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(s.to_string())
}

fn parse_integer(s: &str) -> Option<Number> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = digits.strip_prefix("0o") {
        u64::from_str_radix(oct, 8).ok()?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u64>().ok()?
    };
    if negative {
        if magnitude == (i64::MAX as u64) + 1 {
            return Some(Number::from(i64::MIN));
        }
        let signed = i64::try_from(magnitude).ok()?;
        Some(Number::from(-signed))
    } else {
        Some(Number::from(magnitude))
    }
}
