//! Orchestrator for running a migration.

use crate::cli::Args;
use crate::config::Config;
use crate::layout::{component_name, Layout};
use rayon::prelude::*;
use sfc_migrator::{
    load_sources, migrate_component, Diagnostic, DiagnosticCode, EventTally, MigrateError,
    MigratedComponent,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur while migrating a workspace.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The templates root does not exist.
    #[error("templates directory not found: {0}")]
    MissingTemplateDir(PathBuf),

    /// A template path has no usable file name.
    #[error("cannot derive a component name from {0}")]
    InvalidName(PathBuf),

    /// Failed to read a component pair.
    #[error(transparent)]
    Load(#[from] MigrateError),

    /// Failed to write a component.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrchestratorError {
    /// Report the failure of one component as an error diagnostic.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::Load(err) => err.diagnostic(),
            Self::WriteFailed { .. } => {
                Diagnostic::error(self.to_string(), DiagnosticCode::WriteFailed)
            }
            Self::MissingTemplateDir(_) | Self::InvalidName(_) => {
                Diagnostic::error(self.to_string(), DiagnosticCode::ReadFailed)
            }
        }
    }
}

/// What happened to one template.
#[derive(Debug)]
pub struct ComponentReport {
    /// The template file.
    pub template_path: PathBuf,
    /// Where the component is written.
    pub output_path: PathBuf,
    /// The migrated component, or why it failed.
    pub result: Result<MigratedComponent, OrchestratorError>,
    /// Whether the output file was written.
    pub written: bool,
}

/// Totals for a migration run.
#[derive(Debug, Default)]
pub struct MigrationSummary {
    /// Number of templates found.
    pub component_count: usize,
    /// Number of components migrated.
    pub migrated_count: usize,
    /// Number of output files written.
    pub written_count: usize,
    /// Number of templates that failed.
    pub failed_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Number of event bindings inlined.
    pub applied_bindings: usize,
    /// Event names seen across all views.
    pub events: EventTally,
    /// Time taken.
    pub duration_ms: u64,
}

impl MigrationSummary {
    fn from_reports(reports: &[ComponentReport]) -> Self {
        let mut summary = Self {
            component_count: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match &report.result {
                Ok(component) => {
                    summary.migrated_count += 1;
                    summary.warning_count += component.warning_count();
                    summary.applied_bindings += component.applied_count();
                    summary.events.merge(&component.tally);
                }
                Err(_) => summary.failed_count += 1,
            }
            if report.written {
                summary.written_count += 1;
            }
        }
        summary
    }
}

/// Result of a migration run.
#[derive(Debug)]
pub struct MigrationRun {
    /// One report per template, sorted by template path.
    pub reports: Vec<ComponentReport>,
    pub summary: MigrationSummary,
}

/// Orchestrator for running vue-migrate.
pub struct Orchestrator {
    /// Configuration.
    config: Config,
    /// Path layout derived from the configuration.
    layout: Layout,
    /// Skip writing outputs.
    dry_run: bool,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(workspace: PathBuf, args: &Args) -> miette::Result<Self> {
        let config = Config::load(&workspace, args)?;
        Ok(Self::with_config(config, args.dry_run))
    }

    /// Create an orchestrator from a resolved configuration.
    pub fn with_config(config: Config, dry_run: bool) -> Self {
        let layout = Layout::from_config(&config);
        Self {
            config,
            layout,
            dry_run,
        }
    }

    /// Migrate every template under the templates root.
    pub fn run(&self) -> Result<MigrationRun, OrchestratorError> {
        let start = Instant::now();

        let templates = self.find_templates()?;
        info!(
            count = templates.len(),
            root = %self.config.template_dir.display(),
            "found templates"
        );

        let mut reports: Vec<ComponentReport> = templates
            .par_iter()
            .map(|template| self.process(template))
            .collect();
        reports.sort_by(|a, b| a.template_path.cmp(&b.template_path));

        let mut summary = MigrationSummary::from_reports(&reports);
        summary.duration_ms = start.elapsed().as_millis() as u64;

        Ok(MigrationRun { reports, summary })
    }

    /// Find all templates under the templates root.
    fn find_templates(&self) -> Result<Vec<PathBuf>, OrchestratorError> {
        let root = &self.config.template_dir;
        if !root.is_dir() {
            return Err(OrchestratorError::MissingTemplateDir(root.clone()));
        }
        debug!(ignore = ?self.config.ignore_patterns, "scanning {}", root.display());

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.config.should_process(path))
            .collect();
        files.sort();

        Ok(files)
    }

    /// Migrate a single template.
    fn process(&self, template: &Path) -> ComponentReport {
        let Some(name) = component_name(template) else {
            return ComponentReport {
                template_path: template.to_path_buf(),
                output_path: PathBuf::new(),
                result: Err(OrchestratorError::InvalidName(template.to_path_buf())),
                written: false,
            };
        };

        let companion_path = self.layout.companion_path(template, &name);
        let output_path = self.layout.output_path(template, &name);
        debug!(
            template = %template.display(),
            view = %companion_path.display(),
            "migrating {name}"
        );

        let result = load_sources(&name, template, &companion_path)
            .map(|sources| migrate_component(&sources))
            .map_err(OrchestratorError::from);

        let mut written = false;
        let result = match result {
            Ok(component) if !self.dry_run => match write_output(&output_path, &component.sfc) {
                Ok(()) => {
                    written = true;
                    Ok(component)
                }
                Err(err) => Err(err),
            },
            other => other,
        };

        if let Err(err) = &result {
            error!(template = %template.display(), "{err}");
        }

        ComponentReport {
            template_path: template.to_path_buf(),
            output_path,
            result,
            written,
        }
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), OrchestratorError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };
    write().map_err(|source| OrchestratorError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
