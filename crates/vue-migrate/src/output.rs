//! Output formatting for migration reports.

use crate::cli::OutputFormat;
use crate::orchestrator::{ComponentReport, MigrationSummary};
use sfc_migrator::{BindingOutcome, Diagnostic, EventTally, MigratedComponent, Severity};
use std::path::Path;

/// Formatter for migration output.
pub struct OutputFormatter {
    format: OutputFormat,
    dry_run: bool,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, dry_run: bool) -> Self {
        Self { format, dry_run }
    }

    /// Print the report of one template.
    pub fn print_component(&self, report: &ComponentReport) {
        match self.format {
            OutputFormat::Human => self.print_component_human(report, false),
            OutputFormat::HumanVerbose => self.print_component_human(report, true),
            OutputFormat::Json => println!("{}", component_json(report)),
            OutputFormat::Machine => self.print_component_machine(report),
        }
    }

    /// Print the event names seen across the run.
    pub fn print_events(&self, events: &EventTally) {
        match self.format {
            OutputFormat::Human | OutputFormat::HumanVerbose => {
                println!();
                println!("events are:");
                for (name, count) in events.iter() {
                    println!("  {name} ({count})");
                }
            }
            OutputFormat::Json => {
                let events: serde_json::Map<String, serde_json::Value> = events
                    .iter()
                    .map(|(name, count)| (name.to_string(), count.into()))
                    .collect();
                println!("{}", serde_json::json!({ "type": "events", "events": events }));
            }
            OutputFormat::Machine => {
                for (name, count) in events.iter() {
                    println!("event:{name}:{count}");
                }
            }
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, summary: &MigrationSummary) {
        match self.format {
            OutputFormat::Human | OutputFormat::HumanVerbose => self.print_summary_human(summary),
            OutputFormat::Json => println!("{}", summary_json(summary, self.dry_run)),
            OutputFormat::Machine => {
                // No summary for machine format
            }
        }
    }

    // Human format

    fn print_component_human(&self, report: &ComponentReport, verbose: bool) {
        let component = match &report.result {
            Ok(component) => component,
            Err(err) => {
                println!("\x1b[31m✗\x1b[0m {}", report.template_path.display());
                print_diagnostic_human(&report.template_path, &err.diagnostic());
                return;
            }
        };

        let action = if self.dry_run { "would write" } else { "wrote" };
        println!(
            "\x1b[32m✓\x1b[0m {} → {} ({})",
            report.template_path.display(),
            report.output_path.display(),
            action
        );

        for diagnostic in &component.diagnostics {
            print_diagnostic_human(&report.template_path, diagnostic);
        }

        if verbose {
            print_details_human(component);
        }
    }

    fn print_summary_human(&self, summary: &MigrationSummary) {
        println!();
        let written = if self.dry_run {
            "dry run, nothing written".to_string()
        } else {
            format!("{} written", summary.written_count)
        };
        println!(
            "\x1b[32m✓\x1b[0m Migrated {} of {} component{} ({}, {} event binding{} inlined, {}ms)",
            summary.migrated_count,
            summary.component_count,
            plural(summary.component_count),
            written,
            summary.applied_bindings,
            plural(summary.applied_bindings),
            summary.duration_ms
        );
        if summary.failed_count > 0 {
            println!(
                "\x1b[31m✗\x1b[0m {} component{} failed",
                summary.failed_count,
                plural(summary.failed_count)
            );
        }
        if summary.warning_count > 0 {
            println!(
                "\x1b[33m⚠\x1b[0m Found {} warning{}",
                summary.warning_count,
                plural(summary.warning_count)
            );
        }
    }

    // Machine format

    fn print_component_machine(&self, report: &ComponentReport) {
        let file = report.template_path.display();
        let diagnostics = match &report.result {
            Ok(component) => component.diagnostics.clone(),
            Err(err) => vec![err.diagnostic()],
        };
        for diagnostic in &diagnostics {
            println!(
                "{}:{}:{}:{}:{}",
                file,
                diagnostic.line.unwrap_or(0),
                diagnostic.severity.as_str(),
                diagnostic.code,
                diagnostic.message.replace(':', "\\:")
            );
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn print_diagnostic_human(file: &Path, diagnostic: &Diagnostic) {
    let severity_str = match diagnostic.severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
    };
    let location = match diagnostic.line {
        Some(line) => format!("{}:{}", file.display(), line),
        None => file.display().to_string(),
    };
    println!(
        "  {}: {}[{}]: {}",
        location, severity_str, diagnostic.code, diagnostic.message
    );
}

fn print_details_human(component: &MigratedComponent) {
    for hit in &component.rule_hits {
        println!("    rule {} x{}", hit.rule, hit.count);
    }
    for report in &component.bindings {
        let binding = &report.binding;
        println!(
            "    {} {} -> {}: {}",
            binding.event_name,
            binding.selector,
            binding.handler_name,
            outcome_str(&report.outcome)
        );
    }
}

fn outcome_str(outcome: &BindingOutcome) -> String {
    match outcome {
        BindingOutcome::Applied { elements } => format!("applied on {elements}"),
        BindingOutcome::RegistrationKept { elements } => {
            format!("applied on {elements}, registration kept")
        }
        BindingOutcome::UnsupportedEvent => "unsupported event".to_string(),
        BindingOutcome::UnsupportedSelector => "unsupported selector".to_string(),
        BindingOutcome::UnmatchedSelector => "unmatched selector".to_string(),
    }
}

// JSON format

fn component_json(report: &ComponentReport) -> serde_json::Value {
    let file = report.template_path.to_string_lossy();
    match &report.result {
        Ok(component) => serde_json::json!({
            "type": "component",
            "file": file,
            "name": component.name,
            "output": report.output_path.to_string_lossy(),
            "written": report.written,
            "root": component.descriptor.root_tag(),
            "diagnostics": component
                .diagnostics
                .iter()
                .map(diagnostic_json)
                .collect::<Vec<_>>(),
            "bindings": component
                .bindings
                .iter()
                .map(|report| serde_json::json!({
                    "event": report.binding.event_name,
                    "selector": report.binding.selector.to_string(),
                    "handler": report.binding.handler_name,
                    "outcome": outcome_str(&report.outcome),
                }))
                .collect::<Vec<_>>(),
            "rules": component
                .rule_hits
                .iter()
                .map(|hit| serde_json::json!({ "rule": hit.rule.as_str(), "count": hit.count }))
                .collect::<Vec<_>>(),
        }),
        Err(err) => serde_json::json!({
            "type": "component",
            "file": file,
            "error": err.to_string(),
            "diagnostics": [diagnostic_json(&err.diagnostic())],
        }),
    }
}

fn diagnostic_json(diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "severity": diagnostic.severity.as_str(),
        "code": diagnostic.code.as_str(),
        "message": diagnostic.message,
        "line": diagnostic.line,
    })
}

fn summary_json(summary: &MigrationSummary, dry_run: bool) -> serde_json::Value {
    serde_json::json!({
        "type": "summary",
        "components": summary.component_count,
        "migrated": summary.migrated_count,
        "written": summary.written_count,
        "failed": summary.failed_count,
        "warnings": summary.warning_count,
        "bindings": summary.applied_bindings,
        "dry_run": dry_run,
        "duration_ms": summary.duration_ms
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::OrchestratorError;
    use pretty_assertions::assert_eq;
    use sfc_migrator::{migrate_component, ComponentSources, MigrateError};
    use std::io;
    use std::path::PathBuf;

    fn report() -> ComponentReport {
        let view = "  events() {\n    return {\n      'click .a': 'onA',\n    };\n  }\n";
        let component = migrate_component(&ComponentSources::new(
            "Row",
            "<li class=\"a\"><% print(x) %></li>\n",
            Some(view.to_string()),
        ));
        ComponentReport {
            template_path: PathBuf::from("t/row.html"),
            output_path: PathBuf::from("t/Row.vue"),
            result: Ok(component),
            written: true,
        }
    }

    #[test]
    fn test_component_json() {
        let json = component_json(&report());
        assert_eq!(json["name"], "Row");
        assert_eq!(json["written"], true);
        assert_eq!(json["root"], "div");
        assert_eq!(json["bindings"][0]["outcome"], "applied on 1");
        assert_eq!(json["bindings"][0]["selector"], ".a");
        assert_eq!(json["diagnostics"][0]["code"], "leftover-scriptlet");
        assert_eq!(json["diagnostics"][0]["line"], 1);
    }

    #[test]
    fn test_failed_component_json() {
        let report = ComponentReport {
            template_path: PathBuf::from("t/row.html"),
            output_path: PathBuf::from("t/Row.vue"),
            result: Err(OrchestratorError::Load(MigrateError::ReadTemplate {
                path: PathBuf::from("t/row.html"),
                source: io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
            })),
            written: false,
        };
        let json = component_json(&report);
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["code"], "read-failed");
        assert_eq!(
            json["error"],
            "failed to read template t/row.html: stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn test_summary_json() {
        let summary = MigrationSummary {
            component_count: 3,
            migrated_count: 2,
            failed_count: 1,
            ..Default::default()
        };
        let json = summary_json(&summary, true);
        assert_eq!(json["type"], "summary");
        assert_eq!(json["failed"], 1);
        assert_eq!(json["dry_run"], true);
    }
}
