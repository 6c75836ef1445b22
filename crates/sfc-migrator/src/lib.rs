//! Backbone component to Vue single file component migration.
//!
//! This crate fuses the two halves of a component pair:
//! - The scriptlet template, translated by [`template_translator`]
//! - The companion view class, analyzed by [`view_analyzer`]
//!
//! Event map entries are inlined onto template elements, the view class is
//! rewritten for `<script setup>`, and the result is assembled into one
//! `.vue` file. Migration of a loaded pair never fails; anything that could
//! not be converted is reported as a [`Diagnostic`].

pub mod assemble;
pub mod diagnostics;
pub mod resolver;
pub mod tally;

pub use assemble::assemble;
pub use diagnostics::{leftover_scriptlets, Diagnostic, DiagnosticCode, Severity};
pub use resolver::{resolve_event_bindings, BindingOutcome, BindingReport, Resolution};
pub use tally::EventTally;

use std::io;
use std::path::{Path, PathBuf};
use template_translator::{translate, RuleHit};
use thiserror::Error;
use tracing::{debug, warn};
use view_analyzer::{transform_script, ComponentDescriptor};

/// Errors that can occur while loading a component pair.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read view {path}: {source}")]
    ReadCompanion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MigrateError {
    /// Report the failure as an error diagnostic.
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string(), DiagnosticCode::ReadFailed)
    }
}

/// The source texts of one component pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSources {
    /// Component name, used for the output file.
    pub name: String,
    /// Template text.
    pub template: String,
    /// Companion view text, if the view exists.
    pub companion: Option<String>,
}

impl ComponentSources {
    /// Create sources from in-memory text.
    pub fn new(name: impl Into<String>, template: impl Into<String>, companion: Option<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            companion,
        }
    }
}

/// Read a component pair from disk.
///
/// A missing companion is not an error; it yields `companion: None`.
pub fn load_sources(
    name: &str,
    template_path: &Path,
    companion_path: &Path,
) -> Result<ComponentSources, MigrateError> {
    let template =
        std::fs::read_to_string(template_path).map_err(|source| MigrateError::ReadTemplate {
            path: template_path.to_path_buf(),
            source,
        })?;

    let companion = match std::fs::read_to_string(companion_path) {
        Ok(text) => Some(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(MigrateError::ReadCompanion {
                path: companion_path.to_path_buf(),
                source,
            })
        }
    };

    Ok(ComponentSources::new(name, template, companion))
}

/// The result of migrating one component.
#[derive(Debug, Clone)]
pub struct MigratedComponent {
    /// Component name.
    pub name: String,
    /// The assembled `.vue` text.
    pub sfc: String,
    /// What the view declared.
    pub descriptor: ComponentDescriptor,
    /// Outcome of every event map entry.
    pub bindings: Vec<BindingReport>,
    /// Event names seen in this component.
    pub tally: EventTally,
    /// Things that need manual attention.
    pub diagnostics: Vec<Diagnostic>,
    /// Translation rules that matched.
    pub rule_hits: Vec<RuleHit>,
}

impl MigratedComponent {
    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Number of event bindings inlined.
    pub fn applied_count(&self) -> usize {
        self.bindings
            .iter()
            .filter(|report| report.outcome.is_applied())
            .count()
    }
}

/// Migrate one component pair.
///
/// Sources are processed with `\n` line breaks. When either source uses
/// `\r\n`, the assembled component does too.
pub fn migrate_component(sources: &ComponentSources) -> MigratedComponent {
    let mut diagnostics = Vec::new();

    let crlf = sources.template.contains("\r\n")
        || sources
            .companion
            .as_deref()
            .is_some_and(|text| text.contains("\r\n"));
    let template = sources.template.replace("\r\n", "\n");
    let companion = sources
        .companion
        .as_deref()
        .map(|text| text.replace("\r\n", "\n"));

    let companion = match &companion {
        Some(text) => text.as_str(),
        None => {
            warn!(component = %sources.name, "no companion view, using defaults");
            diagnostics.push(Diagnostic::warning(
                format!("no view found for `{}`", sources.name),
                DiagnosticCode::MissingCompanion,
            ));
            ""
        }
    };

    let descriptor = ComponentDescriptor::from_view_source(companion);
    if descriptor.unterminated_event_map {
        warn!(component = %sources.name, "events() object is not closed");
        diagnostics.push(Diagnostic::warning(
            "the `events()` object has no closing brace, entries were read up to the end of the view",
            DiagnosticCode::UnterminatedEventMap,
        ));
    }

    let translation = translate(&template);
    for hit in &translation.hits {
        debug!(component = %sources.name, rule = %hit.rule, count = hit.count, "applied rule");
    }
    diagnostics.extend(leftover_scriptlets(&translation.code));

    let resolution = resolve_event_bindings(&translation.code, companion, &descriptor);
    diagnostics.extend(resolution.reports.iter().filter_map(binding_diagnostic));

    let script = transform_script(&resolution.companion);
    let mut sfc = assemble(&descriptor, &resolution.template, &script);
    if crlf {
        sfc = sfc.replace('\n', "\r\n");
    }

    MigratedComponent {
        name: sources.name.clone(),
        sfc,
        descriptor,
        bindings: resolution.reports,
        tally: resolution.tally,
        diagnostics,
        rule_hits: translation.hits,
    }
}

fn binding_diagnostic(report: &BindingReport) -> Option<Diagnostic> {
    let binding = &report.binding;
    let (message, code) = match report.outcome {
        BindingOutcome::Applied { .. } => return None,
        BindingOutcome::RegistrationKept { .. } => (
            format!(
                "`{}` was inlined but its `events()` entry is not on a line of its own and was kept",
                binding.handler_name
            ),
            DiagnosticCode::RegistrationKept,
        ),
        BindingOutcome::UnsupportedEvent => (
            format!(
                "event `{}` on `{}` is not supported, `{}` left in the view",
                binding.event_name, binding.selector, binding.handler_name
            ),
            DiagnosticCode::UnsupportedEvent,
        ),
        BindingOutcome::UnsupportedSelector => (
            format!(
                "selector `{}` for `{}` is not a single class or id",
                binding.selector, binding.handler_name
            ),
            DiagnosticCode::UnsupportedSelector,
        ),
        BindingOutcome::UnmatchedSelector => (
            format!(
                "no element matches `{}` for `{}`",
                binding.selector, binding.handler_name
            ),
            DiagnosticCode::UnmatchedSelector,
        ),
    };
    Some(Diagnostic::warning(message, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_companion() {
        let component = migrate_component(&ComponentSources::new("Badge", "<span><%= ob.n %></span>", None));
        assert!(component.sfc.starts_with("<template>\n  <div>\n<span>{{ ob.n }}</span>\n  </div>\n"));
        assert_eq!(component.diagnostics.len(), 1);
        assert_eq!(component.diagnostics[0].code, DiagnosticCode::MissingCompanion);
        assert!(component.bindings.is_empty());
        assert!(component.tally.is_empty());
    }

    #[test]
    fn test_binding_diagnostics() {
        let view = "export default class extends baseVw {\n  events() {\n    return {\n      'click .js-go': 'onGo',\n      'submit form': 'onSubmit',\n      'click .js-none': 'onNone',\n    };\n  }\n}\n";
        let component = migrate_component(&ComponentSources::new(
            "Form",
            "<button class=\"js-go\">Go</button>\n",
            Some(view.to_string()),
        ));
        let codes: Vec<_> = component.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            [DiagnosticCode::UnsupportedEvent, DiagnosticCode::UnmatchedSelector]
        );
        assert_eq!(component.applied_count(), 1);
        assert_eq!(component.warning_count(), 2);
        assert_eq!(component.tally.count("click"), 2);
        assert!(component.sfc.contains("<button class=\"js-go\" @click=\"onGo\">Go</button>"));
        assert!(!component.sfc.contains("'click .js-go'"));
        assert!(component.sfc.contains("'submit form': 'onSubmit',"));
    }

    #[test]
    fn test_crlf_sources() {
        let view = "export default class extends baseVw {\r\n  events() {\r\n    return {\r\n      'click .js-go': 'onGo',\r\n    };\r\n  }\r\n}\r\n";
        let component = migrate_component(&ComponentSources::new(
            "Go",
            "<% if (a) { %>\r\n  <i class=\"js-go\"></i>\r\n<% } %>\r\n",
            Some(view.to_string()),
        ));
        assert_eq!(component.applied_count(), 1);
        assert!(component.diagnostics.is_empty());
        assert!(!component.sfc.contains("'click .js-go'"));
        assert!(component
            .sfc
            .contains("<div v-if=\"a\">\r\n  <i class=\"js-go\" @click=\"onGo\"></i>\r\n</div>\r\n"));
        assert!(!component.sfc.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_unterminated_event_map_is_reported() {
        let view = "export default class extends baseVw {\n  events() {\n    return {\n      'click .a': 'onA',\n";
        let component = migrate_component(&ComponentSources::new(
            "Broken",
            "<i class=\"a\"></i>\n",
            Some(view.to_string()),
        ));
        assert_eq!(component.diagnostics[0].code, DiagnosticCode::UnterminatedEventMap);
        assert_eq!(component.applied_count(), 1);
    }

    #[test]
    fn test_kept_registration_is_reported() {
        let view = "  events() {\n    return { 'click .a': 'onA' };\n  }\n";
        let component = migrate_component(&ComponentSources::new(
            "Inline",
            "<i class=\"a\"></i>\n",
            Some(view.to_string()),
        ));
        assert_eq!(component.diagnostics.len(), 1);
        assert_eq!(component.diagnostics[0].code, DiagnosticCode::RegistrationKept);
    }

    #[test]
    fn test_read_failure_diagnostic() {
        let err = MigrateError::ReadTemplate {
            path: PathBuf::from("t/a.html"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let diagnostic = err.diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.code, DiagnosticCode::ReadFailed);
        assert_eq!(diagnostic.message, "failed to read template t/a.html: denied");
    }

    #[test]
    fn test_leftover_scriptlet_is_reported() {
        let component = migrate_component(&ComponentSources::new(
            "Raw",
            "<p><% print(ob.html) %></p>\n",
            Some(String::new()),
        ));
        assert_eq!(component.diagnostics.len(), 1);
        assert_eq!(component.diagnostics[0].code, DiagnosticCode::LeftoverScriptlet);
        assert_eq!(component.diagnostics[0].line, Some(1));
    }
}
