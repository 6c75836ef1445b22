//! Root element metadata declared by a view class.

use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_NAME: Lazy<Regex> = Lazy::new(|| accessor_pattern("className"));
static TAG_NAME: Lazy<Regex> = Lazy::new(|| accessor_pattern("tagName"));

/// Build the pattern for an accessor whose body is a single
/// `return '<literal>';` statement. The `get` keyword is optional.
fn accessor_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?:^|\n)[ \t]*(?:get\s*)?{name}\(\s*\)\s*\{{\s*\n\s*return\s+['"`](.*?)['"`];?\s*\n"#
    ))
    .expect("valid accessor pattern")
}

/// Root element metadata of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewMetadata {
    /// Value of the `tagName()` accessor.
    pub tag_name: Option<String>,
    /// Value of the `className()` accessor.
    pub class_name: Option<String>,
}

/// Extract the root tag name and class name from view source.
///
/// Only the first declaration of each accessor is used. Missing or empty
/// values are `None`.
pub fn extract_metadata(source: &str) -> ViewMetadata {
    ViewMetadata {
        tag_name: first_literal(&TAG_NAME, source),
        class_name: first_literal(&CLASS_NAME, source),
    }
}

fn first_literal(pattern: &Regex, source: &str) -> Option<String> {
    pattern
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
