use serde_json::json;

use jotsync::yaml::{dump, load, DumpOptions, Mark, QuoteStyle};
use jotsync::ParseError;

#[test]
fn test_plain_scalar_resolution() {
    let source = "\
n: null
y: ~
b: True
f: FALSE
i: 42
neg: -7
hex: 0x1F
oct: 0o17
fl: 2.5
exp: 1e3
plus: +3
s: hello world
";
    let value = load(source).expect("Scalar forms should parse");
    assert_eq!(
        value,
        json!({
            "n": null,
            "y": null,
            "b": true,
            "f": false,
            "i": 42,
            "neg": -7,
            "hex": 31,
            "oct": 15,
            "fl": 2.5,
            "exp": 1000.0,
            "plus": 3,
            "s": "hello world"
        })
    );
}

#[test]
fn test_non_finite_numbers_stay_strings() {
    // JSON has no representation for these, so they resolve as strings.
    let value = load("a: .inf\nb: nan\nc: inf").expect("Input should parse");
    assert_eq!(value, json!({ "a": ".inf", "b": "nan", "c": "inf" }));
}

#[test]
fn test_flow_collections() {
    let source = "\
nums: [1, 2, 3]
pair: {a: 1, b: two}
nested: [[1], {k: v}]
none: {}
empty: []
";
    let value = load(source).expect("Flow collections should parse");
    assert_eq!(
        value,
        json!({
            "nums": [1, 2, 3],
            "pair": { "a": 1, "b": "two" },
            "nested": [[1], { "k": "v" }],
            "none": {},
            "empty": []
        })
    );
}

#[test]
fn test_comments_are_ignored() {
    let source = "# top comment\na: 1 # trailing\n\n   # indented comment\nb: 2\n";
    let value = load(source).expect("Comments should be ignored");
    assert_eq!(value, json!({ "a": 1, "b": 2 }));
}

#[test]
fn test_sequence_at_parent_indentation() {
    let source = "roles:\n- admin\n- ops\nnext: 1\n";
    let value = load(source).expect("Zero-indented sequences belong to the key above");
    assert_eq!(value, json!({ "roles": ["admin", "ops"], "next": 1 }));
}

#[test]
fn test_compact_nested_forms() {
    let source = "- - 1\n  - 2\n- a: 1\n  b: 2\n";
    let value = load(source).expect("Compact forms should parse");
    assert_eq!(value, json!([[1, 2], { "a": 1, "b": 2 }]));
}

#[test]
fn test_quoted_keys_and_escapes() {
    let value = load(r#""a:b": 1"#).expect("Quoted keys may contain colons");
    assert_eq!(value, json!({ "a:b": 1 }));

    let value = load(r#"s: "a\tb\u0041\\""#).expect("Escapes should decode");
    assert_eq!(value, json!({ "s": "a\tbA\\" }));

    let value = load(r#"e: "\uD83D\uDE00""#).expect("Surrogate pairs should combine");
    assert_eq!(value, json!({ "e": "😀" }));

    let value = load("q: 'it''s fine'").expect("Single quotes double to escape");
    assert_eq!(value, json!({ "q": "it's fine" }));
}

#[test]
fn test_dump_canonical_style() {
    let value = json!({
        "a": { "b": [1, 2] },
        "s": "x: y",
        "t": "true"
    });
    let text = dump(&value, &DumpOptions::default());
    assert_eq!(
        text,
        "a:\n  b:\n    - 1\n    - 2\ns: \"x: y\"\nt: \"true\"\n",
        "2-space indent, double quotes only where required"
    );
}

#[test]
fn test_dump_single_quote_style() {
    let opts = DumpOptions {
        indent: 2,
        quote: QuoteStyle::Single,
    };

    let text = dump(&json!({ "s": "it's: ok" }), &opts);
    assert_eq!(text, "s: 'it''s: ok'\n");
    assert_eq!(
        load(&text).expect("Single-quoted output should parse back"),
        json!({ "s": "it's: ok" })
    );

    // single quotes cannot hold control characters; fall back to double
    let text = dump(&json!({ "c": "a\nb" }), &opts);
    assert_eq!(text, "c: \"a\\nb\"\n");
}

#[test]
fn test_marks_are_zero_based_at_the_engine_boundary() {
    let err = load("a: [1,").expect_err("Flow collection is unterminated");
    assert_eq!(err.mark, Some(Mark { line: 0, column: 6 }));

    // the conversion layer shifts marks to 1-based positions
    let converted = ParseError::from(err);
    assert_eq!(converted.line, Some(1));
    assert_eq!(converted.column, Some(7));
}

#[test]
fn test_load_error_display_includes_position() {
    let err = load("a: 1\na: 2").expect_err("Duplicate key");
    let rendered = format!("{}", err);
    assert!(
        rendered.contains("line 2"),
        "Display carries a 1-based position: {rendered}"
    );
}

#[test]
fn test_bad_indentation_is_reported() {
    let err = load("a:\n  b: 1\n   c: 2").expect_err("Sibling keys must align");
    assert_eq!(err.reason, "bad indentation of a mapping entry");
    assert_eq!(err.mark.map(|m| m.line), Some(2));
}

#[test]
fn test_empty_source_is_null() {
    assert_eq!(load("").expect("Empty source is valid"), json!(null));
    assert_eq!(load("# only comments\n").expect("Comments only"), json!(null));
}
