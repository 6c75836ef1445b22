//! Converts a view class into `<script setup>` content.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Text that starts the view class declaration.
pub const CLASS_MARKER: &str = "export default class";

/// The class initializer and the lifecycle hook it is renamed to.
pub const INITIALIZER: &str = "constructor(";
pub const LIFECYCLE_HOOK: &str = "loadData(";

static METHOD_SHORTHAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]+)(async[ \t]+)?(\w+)(\(.*\)[ \t]*\{)([ \t\r]*)$")
        .expect("valid method shorthand pattern")
});

/// Words that look like a method head when followed by `(...) {`.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "function", "return", "typeof",
];

/// A view class split into module-level header and setup body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptParts {
    /// Everything before the class declaration, such as imports.
    pub header: String,
    /// The class body with the wrapper removed.
    pub body: String,
}

/// Transform view source into header and body.
///
/// Without a class declaration the whole text is treated as header.
pub fn transform_script(source: &str) -> ScriptParts {
    let converted = convert_method_shorthand(source);

    let (header, rest) = match converted.find(CLASS_MARKER) {
        Some(pos) => (&converted[..pos], drop_first_line(&converted[pos..])),
        None => (converted.as_str(), ""),
    };

    ScriptParts {
        header: header.to_string(),
        body: rename_initializer(strip_closing_brace(rest)),
    }
}

/// Turn indented `name(args) {` method heads into function declarations.
pub fn convert_method_shorthand(source: &str) -> String {
    METHOD_SHORTHAND
        .replace_all(source, |caps: &Captures<'_>| {
            let name = &caps[3];
            if STATEMENT_KEYWORDS.contains(&name) {
                return caps[0].to_string();
            }
            format!(
                "{}{}function {}{}{}",
                &caps[1],
                caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
                name,
                &caps[4],
                &caps[5]
            )
        })
        .into_owned()
}

/// Rename every initializer occurrence to the lifecycle hook.
///
/// This is a plain text substitution; occurrences inside strings and
/// comments are renamed too.
pub fn rename_initializer(body: &str) -> String {
    body.replace(INITIALIZER, LIFECYCLE_HOOK)
}

fn drop_first_line(text: &str) -> &str {
    match text.find('\n') {
        Some(pos) => &text[pos + 1..],
        None => "",
    }
}

/// Remove the class body's closing brace when it is the last non-blank
/// content and sits at the start of its line.
fn strip_closing_brace(body: &str) -> &str {
    match body.trim_end().strip_suffix('}') {
        Some(rest) if rest.is_empty() || rest.ends_with('\n') => rest,
        _ => body,
    }
}
