//! Value-level rules: attribute bindings, conditional prints and
//! interpolation.
//!
//! These run before the structural rules. They only consume `<%=` markers
//! and single-line `<% if (...) print(...) %>` scriptlets, so block
//! scriptlets are still intact when the structural rules see them.

use crate::rule::{group, Rule, RuleId};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLAIN_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#" (\S+)="<%=\s*(.+?)\s*%>""#).expect("valid plain attribute pattern")
});

static MIXED_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#" (\S+)="([^"]*)<%=\s*(.+?)\s*%>([^"]*)""#)
        .expect("valid mixed attribute pattern")
});

static BOOLEAN_PRINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" <% if \((.*?)\) print\('(selected|disabled|checked|required)'\);?\s*%>")
        .expect("valid boolean print pattern")
});

static VISIBILITY_PRINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" <% if \((.*?)\) print\('hide'\);?\s*%>").expect("valid visibility pattern")
});

static CONDITIONAL_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#" (\S+)="([^"]*) <% if \((.*?)\) print\('(\S+)'\);?\s+%>(.*?)""#)
        .expect("valid conditional class pattern")
});

static BARE_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" ([A-Za-z_][\w:.-]*)=<%=\s*(.*?)\s*%>").expect("valid bare attribute pattern")
});

static INTERPOLATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<%=\s*(.+?)\s*%>").expect("valid interpolation pattern"));

/// ` attr="<%= expr %>"` becomes ` :attr="expr"`.
pub static PLAIN_ATTRIBUTE_BINDING: Rule =
    Rule::new(RuleId::PlainAttributeBinding, &PLAIN_ATTRIBUTE, render_bound);

/// ` attr="a-<%= expr %>-b"` becomes `` :attr="`a-${expr}-b`" ``.
pub static MIXED_ATTRIBUTE_BINDING: Rule =
    Rule::new(RuleId::MixedAttributeBinding, &MIXED_ATTRIBUTE, render_mixed);

/// ` <% if (cond) print('checked'); %>` becomes ` :checked="cond"`.
pub static CONDITIONAL_BOOLEAN_ATTRIBUTE: Rule = Rule::new(
    RuleId::ConditionalBooleanAttribute,
    &BOOLEAN_PRINT,
    render_boolean,
);

/// ` <% if (cond) print('hide'); %>` becomes ` :hidden="cond"`.
pub static CONDITIONAL_VISIBILITY: Rule =
    Rule::new(RuleId::ConditionalVisibility, &VISIBILITY_PRINT, render_hidden);

/// ` class="a <% if (cond) print('b'); %>"` becomes
/// `` :class="`a ${cond ? 'b' : ''}`" ``.
pub static CONDITIONAL_CLASS_BINDING: Rule = Rule::new(
    RuleId::ConditionalClass,
    &CONDITIONAL_CLASS,
    render_conditional_class,
);

/// ` maxlength=<%= expr %>` becomes ` :maxlength="expr"`.
pub static BARE_ATTRIBUTE_BINDING: Rule =
    Rule::new(RuleId::BareAttributeBinding, &BARE_ATTRIBUTE, render_bound);

/// `<%= expr %>` becomes `{{ expr }}`.
pub static MUSTACHE_INTERPOLATION: Rule =
    Rule::new(RuleId::Interpolation, &INTERPOLATION, render_mustache);

fn render_bound(caps: &Captures<'_>) -> String {
    format!(" :{}=\"{}\"", group(caps, 1), group(caps, 2))
}

fn render_mixed(caps: &Captures<'_>) -> String {
    format!(
        " :{}=\"`{}${{{}}}{}`\"",
        group(caps, 1),
        group(caps, 2),
        group(caps, 3),
        group(caps, 4)
    )
}

fn render_boolean(caps: &Captures<'_>) -> String {
    format!(" :{}=\"{}\"", group(caps, 2), group(caps, 1))
}

fn render_hidden(caps: &Captures<'_>) -> String {
    format!(" :hidden=\"{}\"", group(caps, 1))
}

fn render_conditional_class(caps: &Captures<'_>) -> String {
    format!(
        " :{}=\"`{} ${{{} ? '{}' : ''}}{}`\"",
        group(caps, 1),
        group(caps, 2),
        group(caps, 3),
        group(caps, 4),
        group(caps, 5)
    )
}

fn render_mustache(caps: &Captures<'_>) -> String {
    format!("{{{{ {} }}}}", group(caps, 1))
}
