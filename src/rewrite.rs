//! Line-rewrite rules bridging the Markdown-bullet dialect and the
//! structured-text dialect. Each direction is an ordered list of anchored
//! (pattern, replacement) rules; every rule makes one full pass over the
//! document, rewriting each line at most once, before the next rule runs.
//! Rule order is load-bearing: bullets are normalized before headings
//! become keys, and bold stripping runs last so a bolded heading that just
//! gained a trailing colon still loses its markers.

use regex::Regex;
use std::sync::LazyLock;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Rule {
        Rule {
            pattern: Regex::new(pattern).expect("rewrite rules are valid patterns"),
            replacement,
        }
    }
}

static MARKDOWN_TO_YAML: LazyLock<[Rule; 3]> = LazyLock::new(|| {
    [
        // a bullet must be followed by whitespace to count as a list item
        Rule::new(r"^(\s*)[*+]\s", "$1- "),
        // headings become mapping keys
        Rule::new(r"^(\s*)#+\s+(.*)$", "$1$2:"),
        // bold markers around a key are dropped
        Rule::new(r"^(\s*)\*\*(.+?)\*\*:", "$1$2:"),
    ]
});

static YAML_TO_MARKDOWN: LazyLock<[Rule; 2]> = LazyLock::new(|| {
    [
        // sequence dashes become bullets
        Rule::new(r"^(\s*)-\s", "$1* "),
        // the key at the start of a line gets bold markers
        Rule::new(r"^(\s*)([^:\s]+):", "$1**$2**:"),
    ]
});

/// Rewrites Markdown-bullet text into the structured-text dialect.
pub fn markdown_to_yaml(text: &str) -> String {
    apply(&*MARKDOWN_TO_YAML, text)
}

/// Rewrites structured text into Markdown-bullet form.
pub fn yaml_to_markdown(text: &str) -> String {
    apply(&*YAML_TO_MARKDOWN, text)
}

fn apply(rules: &[Rule], text: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for rule in rules {
        lines = lines
            .iter()
            .map(|line| rule.pattern.replace(line, rule.replacement).into_owned())
            .collect();
    }
    lines.join("\n")
}
