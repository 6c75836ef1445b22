//! Rewrite rules and their identifiers.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;

/// Identifies one rewrite rule in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleId {
    /// `attr="<%= expr %>"`
    PlainAttributeBinding,
    /// `attr="text<%= expr %>text"`
    MixedAttributeBinding,
    /// `<% if (cond) print('selected'); %>` and friends.
    ConditionalBooleanAttribute,
    /// `<% if (cond) print('hide'); %>`
    ConditionalVisibility,
    /// `class="a <% if (cond) print('b'); %>"`
    ConditionalClass,
    /// `maxlength=<%= expr %>`
    BareAttributeBinding,
    /// Any remaining `<%= expr %>`.
    Interpolation,
    /// `<% if (cond) { %>`
    IfOpen,
    /// `<% } else if (cond) { %>`
    ElseIf,
    /// `<% } else { %>`
    Else,
    /// `<% } %>` followed by a line break.
    BlockCloseLineEnd,
    /// `<% } %>` at the end of the text.
    BlockCloseEndOfText,
    /// `<% list.forEach((item) => { %>`
    LoopOpenParenthesized,
    /// `<% list.forEach(item => { %>`
    LoopOpenBare,
    /// `<% list.forEach((item, i) => { %>`
    LoopOpenIndexed,
    /// `<% }); %>` followed by a line break.
    LoopCloseLineEnd,
    /// `<% }); %>` at the end of the text.
    LoopCloseEndOfText,
}

/// Which part of the cascade a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePhase {
    /// Rewrites inside attribute values and text.
    Value,
    /// Rewrites whole scriptlet lines into container elements.
    Structure,
}

impl RuleId {
    /// Get the rule name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainAttributeBinding => "plain-attribute-binding",
            Self::MixedAttributeBinding => "mixed-attribute-binding",
            Self::ConditionalBooleanAttribute => "conditional-boolean-attribute",
            Self::ConditionalVisibility => "conditional-visibility",
            Self::ConditionalClass => "conditional-class",
            Self::BareAttributeBinding => "bare-attribute-binding",
            Self::Interpolation => "interpolation",
            Self::IfOpen => "if-open",
            Self::ElseIf => "else-if",
            Self::Else => "else",
            Self::BlockCloseLineEnd => "block-close",
            Self::BlockCloseEndOfText => "block-close-eof",
            Self::LoopOpenParenthesized => "loop-open",
            Self::LoopOpenBare => "loop-open-bare",
            Self::LoopOpenIndexed => "loop-open-indexed",
            Self::LoopCloseLineEnd => "loop-close",
            Self::LoopCloseEndOfText => "loop-close-eof",
        }
    }

    /// Get the phase this rule runs in.
    pub fn phase(&self) -> RulePhase {
        match self {
            Self::PlainAttributeBinding
            | Self::MixedAttributeBinding
            | Self::ConditionalBooleanAttribute
            | Self::ConditionalVisibility
            | Self::ConditionalClass
            | Self::BareAttributeBinding
            | Self::Interpolation => RulePhase::Value,
            _ => RulePhase::Structure,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single rewrite rule: one recognizer plus the text it renders in place
/// of every match.
pub struct Rule {
    id: RuleId,
    pattern: &'static Lazy<Regex>,
    render: fn(&Captures<'_>) -> String,
}

impl Rule {
    pub(crate) const fn new(
        id: RuleId,
        pattern: &'static Lazy<Regex>,
        render: fn(&Captures<'_>) -> String,
    ) -> Self {
        Self {
            id,
            pattern,
            render,
        }
    }

    /// Get the rule identifier.
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// Apply the rule to every non-overlapping match.
    ///
    /// Returns the rewritten text and the number of matches. Text without a
    /// match is returned borrowed and untouched.
    pub fn apply<'a>(&self, text: &'a str) -> (Cow<'a, str>, usize) {
        let mut hits = 0;
        let rewritten = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            hits += 1;
            (self.render)(caps)
        });
        (rewritten, hits)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Get a capture group as a string, or an empty string when it did not
/// participate in the match.
pub(crate) fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map(|m| m.as_str()).unwrap_or_default()
}
