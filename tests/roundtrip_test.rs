use serde_json::json;

use jotsync::{json_to_markdown, json_to_text, markdown_to_json, text_to_json};

#[test]
fn test_text_mode_roundtrip() {
    let value = json!({
        "user": {
            "name": "Alice",
            "age": 30,
            "active": true,
            "nickname": null
        },
        "roles": ["admin", "ops"],
        "pi": 3.14,
        "total": 3
    });

    println!("=== Text Mode Round-trip Test ===");

    let text = json_to_text(&value);
    println!("Rendered text:\n{}", text);

    let parsed = text_to_json(&text).expect("Rendered text should parse back");
    assert_eq!(parsed, value, "Round-trip JSON -> text -> JSON failed");
    println!("✓ Text mode round-trip successful\n");
}

#[test]
fn test_markdown_mode_roundtrip() {
    let value = json!({
        "user": {
            "name": "Alice",
            "age": 30,
            "active": true,
            "nickname": null
        },
        "roles": ["admin", "ops"],
        "pi": 3.14,
        "total": 3
    });

    println!("=== Markdown Mode Round-trip Test ===");

    let markdown = json_to_markdown(&value);
    println!("Rendered Markdown:\n{}", markdown);

    let parsed = markdown_to_json(&markdown).expect("Rendered Markdown should parse back");
    assert_eq!(parsed, value, "Round-trip JSON -> Markdown -> JSON failed");
    println!("✓ Markdown mode round-trip successful\n");
}

#[test]
fn test_sequence_of_mappings_roundtrip() {
    let value = json!({
        "users": [
            { "id": 1, "name": "Sreeni", "role": "admin" },
            { "id": 2, "name": "Krishna", "role": "admin" },
            { "id": 3, "name": "Aaron", "role": "user" }
        ],
        "metadata": {
            "total": 3,
            "last_updated": "2024-01-15"
        }
    });

    println!("=== Sequence of Mappings Round-trip Test ===");

    let text = json_to_text(&value);
    println!("Rendered text:\n{}", text);
    let parsed = text_to_json(&text).expect("Rendered text should parse back");
    assert_eq!(parsed, value, "Text round-trip of list items failed");

    let markdown = json_to_markdown(&value);
    println!("Rendered Markdown:\n{}", markdown);
    let parsed = markdown_to_json(&markdown).expect("Rendered Markdown should parse back");
    assert_eq!(parsed, value, "Markdown round-trip of list items failed");
    println!("✓ Sequence of mappings round-trip successful\n");
}

#[test]
fn test_strings_needing_quotes_roundtrip() {
    let value = json!({
        "message": "error:404",
        "time": "10:30",
        "flag": "true",
        "num": "42",
        "empty": "",
        "spacey": "  padded  ",
        "multiline": "a\nb",
        "bullet": "* not a list",
        "dash": "- not an item",
        "hash": "a # b",
        "unicode": "héllo ☺"
    });

    println!("=== Quoted Strings Round-trip Test ===");

    let text = json_to_text(&value);
    println!("Rendered text:\n{}", text);
    let parsed = text_to_json(&text).expect("Quoted strings should parse back");
    assert_eq!(parsed, value, "Strings should stay strings, verbatim");

    let markdown = json_to_markdown(&value);
    let parsed = markdown_to_json(&markdown).expect("Quoted strings should survive Markdown");
    assert_eq!(parsed, value, "Markdown round-trip of quoted strings failed");
    println!("✓ Quoted strings round-trip successful\n");
}

#[test]
fn test_nested_arrays_roundtrip() {
    let value = json!({
        "matrix": [[1, 2], [3, 4]],
        "mixed": [[{ "a": 1 }], []],
        "empty_map": {}
    });

    println!("=== Nested Arrays Round-trip Test ===");

    let text = json_to_text(&value);
    println!("Rendered text:\n{}", text);
    let parsed = text_to_json(&text).expect("Nested arrays should parse back");
    assert_eq!(parsed, value, "Nested array round-trip failed");

    let markdown = json_to_markdown(&value);
    let parsed = markdown_to_json(&markdown).expect("Nested arrays should survive Markdown");
    assert_eq!(parsed, value, "Markdown nested array round-trip failed");
    println!("✓ Nested arrays round-trip successful\n");
}

#[test]
fn test_root_level_values_roundtrip() {
    for value in [
        json!([1, "two", null]),
        json!("hello"),
        json!(42),
        json!(true),
        json!(null),
        json!({}),
        json!([]),
    ] {
        let text = json_to_text(&value);
        let parsed = text_to_json(&text).expect("Root value should parse back");
        assert_eq!(parsed, value, "Text round-trip failed for {value}");

        let markdown = json_to_markdown(&value);
        let parsed = markdown_to_json(&markdown).expect("Root value should survive Markdown");
        assert_eq!(parsed, value, "Markdown round-trip failed for {value}");
    }
    println!("✓ Root-level values round-trip successful\n");
}

#[test]
fn test_key_order_is_preserved() {
    let value = json!({
        "zebra": 1,
        "alpha": 2,
        "mango": 3
    });

    let text = json_to_text(&value);
    assert_eq!(
        text, "zebra: 1\nalpha: 2\nmango: 3\n",
        "Keys must serialize in insertion order"
    );

    let reparsed = text_to_json(&text).expect("Ordered mapping should parse back");
    assert_eq!(
        json_to_text(&reparsed),
        text,
        "Order must survive a full round-trip"
    );
    println!("✓ Insertion order preserved\n");
}
