//! Structural rules: branch and loop scriptlets become container elements.
//!
//! Every pattern starts with a `(\s*)` capture holding the whitespace before
//! the scriptlet, including any preceding line break. The renderers echo it
//! back so the generated tag keeps the indentation of the scriptlet it
//! replaces. Closing rules come in two variants, one anchored on a line
//! break and one anchored on the end of the text.

use crate::rule::{group, Rule, RuleId};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Index variable used when a loop callback does not name one.
pub const SYNTHETIC_INDEX: &str = "j";

static IF_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)<%\s*if\s*\((.+?)\)\s*\{\s*(?:%>)?\s*\n").expect("valid if pattern")
});

static ELSE_IF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)<%\s*\}\s*else if\s*\((.+?)\)\s*\{\s*(?:%>)?\s*\n")
        .expect("valid else-if pattern")
});

static ELSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s*)<%\s*\}\s*else\s*\{\s*%>\s*\n").expect("valid else pattern"));

static BLOCK_CLOSE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s*)<%\s*\}\s*%>\s*\n").expect("valid block close pattern"));

static BLOCK_CLOSE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s*)<%\s*\}\s*%>\s*$").expect("valid block close pattern"));

static LOOP_OPEN_PARENTHESIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)<%\s*(\S(?:.*\S)?)\.forEach\(\((\w+)\)\s*=>\s*\{\s*(?:%>)?\s*\n")
        .expect("valid loop pattern")
});

static LOOP_OPEN_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)<%\s*(\S(?:.*\S)?)\.forEach\((\w+)\s*=>\s*\{\s*(?:%>)?\s*\n")
        .expect("valid loop pattern")
});

static LOOP_OPEN_INDEXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)<%\s*(\S(?:.*\S)?)\.forEach\(\((\w+)\s*,\s*(\w+)\)\s*=>\s*\{\s*(?:%>)?\s*\n")
        .expect("valid indexed loop pattern")
});

static LOOP_CLOSE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s*)<%\s*\}\);?\s*%>\s*\n").expect("valid loop close pattern"));

static LOOP_CLOSE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s*)<%\s*\}\);?\s*%>\s*$").expect("valid loop close pattern"));

/// `<% if (cond) { %>` becomes `<div v-if="cond">`.
pub static IF_BLOCK_OPEN: Rule = Rule::new(RuleId::IfOpen, &IF_OPEN, render_if);

/// `<% } else if (cond) { %>` closes the previous branch and opens a
/// `v-else-if` branch.
pub static ELSE_IF_BLOCK: Rule = Rule::new(RuleId::ElseIf, &ELSE_IF, render_else_if);

/// `<% } else { %>` closes the previous branch and opens a `v-else` branch.
pub static ELSE_BLOCK: Rule = Rule::new(RuleId::Else, &ELSE, render_else);

/// `<% } %>` at the end of a line.
pub static BLOCK_CLOSE_LINE_END: Rule =
    Rule::new(RuleId::BlockCloseLineEnd, &BLOCK_CLOSE_LINE, render_close);

/// `<% } %>` as the last thing in the text.
pub static BLOCK_CLOSE_END_OF_TEXT: Rule =
    Rule::new(RuleId::BlockCloseEndOfText, &BLOCK_CLOSE_END, render_close);

/// `<% list.forEach((item) => { %>`
pub static LOOP_BLOCK_OPEN: Rule = Rule::new(
    RuleId::LoopOpenParenthesized,
    &LOOP_OPEN_PARENTHESIZED,
    render_loop,
);

/// `<% list.forEach(item => { %>`
pub static LOOP_BLOCK_OPEN_BARE: Rule =
    Rule::new(RuleId::LoopOpenBare, &LOOP_OPEN_BARE, render_loop);

/// `<% list.forEach((item, i) => { %>`
pub static LOOP_BLOCK_OPEN_INDEXED: Rule =
    Rule::new(RuleId::LoopOpenIndexed, &LOOP_OPEN_INDEXED, render_indexed_loop);

/// `<% }); %>` at the end of a line.
pub static LOOP_CLOSE_LINE_END: Rule =
    Rule::new(RuleId::LoopCloseLineEnd, &LOOP_CLOSE_LINE, render_close);

/// `<% }); %>` as the last thing in the text.
pub static LOOP_CLOSE_END_OF_TEXT: Rule =
    Rule::new(RuleId::LoopCloseEndOfText, &LOOP_CLOSE_END, render_close);

/// The indentation part of the leading whitespace: everything after its
/// last line break.
fn indentation(leading: &str) -> &str {
    match leading.rfind('\n') {
        Some(pos) => &leading[pos + 1..],
        None => leading,
    }
}

fn render_if(caps: &Captures<'_>) -> String {
    format!("{}<div v-if=\"{}\">\n", group(caps, 1), group(caps, 2))
}

fn render_else_if(caps: &Captures<'_>) -> String {
    let leading = group(caps, 1);
    format!(
        "{}</div>\n{}<div v-else-if=\"{}\">\n",
        leading,
        indentation(leading),
        group(caps, 2)
    )
}

fn render_else(caps: &Captures<'_>) -> String {
    let leading = group(caps, 1);
    format!("{}</div>\n{}<div v-else>\n", leading, indentation(leading))
}

fn render_close(caps: &Captures<'_>) -> String {
    format!("{}</div>\n", group(caps, 1))
}

fn render_loop(caps: &Captures<'_>) -> String {
    format!(
        "{}<div v-for=\"({}, {index}) in {}\" :key=\"{index}\">\n",
        group(caps, 1),
        group(caps, 3),
        group(caps, 2),
        index = SYNTHETIC_INDEX
    )
}

fn render_indexed_loop(caps: &Captures<'_>) -> String {
    format!(
        "{}<div v-for=\"({}, {index}) in {}\" :key=\"{index}\">\n",
        group(caps, 1),
        group(caps, 3),
        group(caps, 2),
        index = group(caps, 4)
    )
}
