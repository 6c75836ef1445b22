//! Migration diagnostics.
//!
//! The migrated output is meant to be reviewed by hand. Diagnostics point the
//! reviewer at what the migration could not convert.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static LEFTOVER_SCRIPTLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<%.*?(?:%>|$)").expect("valid scriptlet pattern"));

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic message.
    pub message: String,
    /// 1-based line in the translated template, when applicable.
    pub line: Option<usize>,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic code.
    pub code: DiagnosticCode,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self {
            message: message.into(),
            line: None,
            severity: Severity::Warning,
            code,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self {
            message: message.into(),
            line: None,
            severity: Severity::Error,
            code,
        }
    }

    /// Attach a line number.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The component could not be migrated.
    Error,
    /// Part of the component needs manual work.
    Warning,
}

impl Severity {
    /// Get the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// The template has no companion view file.
    MissingCompanion,
    /// An event map entry uses an event outside the supported set.
    UnsupportedEvent,
    /// An event map entry uses a selector other than one class or id.
    UnsupportedSelector,
    /// No element in the template matches an event map selector.
    UnmatchedSelector,
    /// An inlined event map entry could not be removed from the view.
    RegistrationKept,
    /// The `events()` object has no matching closing brace.
    UnterminatedEventMap,
    /// A scriptlet survived translation.
    LeftoverScriptlet,
    /// The template or view file could not be read.
    ReadFailed,
    /// The migrated component could not be written.
    WriteFailed,
}

impl DiagnosticCode {
    /// Get the code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCompanion => "missing-companion",
            Self::UnsupportedEvent => "unsupported-event",
            Self::UnsupportedSelector => "unsupported-selector",
            Self::UnmatchedSelector => "unmatched-selector",
            Self::RegistrationKept => "registration-kept",
            Self::UnterminatedEventMap => "unterminated-event-map",
            Self::LeftoverScriptlet => "leftover-scriptlet",
            Self::ReadFailed => "read-failed",
            Self::WriteFailed => "write-failed",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Report every scriptlet still present in a translated template.
pub fn leftover_scriptlets(template: &str) -> Vec<Diagnostic> {
    template
        .lines()
        .enumerate()
        .flat_map(|(index, line)| {
            LEFTOVER_SCRIPTLET.find_iter(line).map(move |m| {
                Diagnostic::warning(
                    format!("untranslated scriptlet `{}`", m.as_str().trim()),
                    DiagnosticCode::LeftoverScriptlet,
                )
                .at_line(index + 1)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leftover_scriptlets() {
        let template = "<div>\n  <% print(ob.raw) %>\n  <p>{{ a }}</p>\n  <% if (x) {\n</div>\n";
        let diagnostics = leftover_scriptlets(template);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, Some(2));
        assert_eq!(diagnostics[0].message, "untranslated scriptlet `<% print(ob.raw) %>`");
        assert_eq!(diagnostics[1].line, Some(4));
        assert_eq!(diagnostics[1].code, DiagnosticCode::LeftoverScriptlet);
        assert_eq!(diagnostics[1].severity, Severity::Warning);
    }

    #[test]
    fn test_clean_template_has_no_diagnostics() {
        assert!(leftover_scriptlets("<div v-if=\"a\">\n</div>\n").is_empty());
    }
}
