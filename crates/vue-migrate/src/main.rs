//! vue-migrate - Backbone to Vue component migration.

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod config;
mod layout;
mod orchestrator;
mod output;

use cli::Args;
use orchestrator::Orchestrator;
use output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing(args.is_verbose());

    // Set up miette for nice error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr. `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "vue_migrate=debug,sfc_migrator=debug"
    } else {
        "vue_migrate=info,sfc_migrator=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let workspace = match args.workspace.clone() {
        Some(workspace) => workspace,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let orchestrator = Orchestrator::new(workspace, &args)?;
    let formatter = OutputFormatter::new(args.output, args.dry_run);

    let run = orchestrator.run().into_diagnostic()?;

    for report in &run.reports {
        formatter.print_component(report);
    }
    formatter.print_events(&run.summary.events);
    formatter.print_summary(&run.summary);

    let failed = run.summary.failed_count > 0
        || (args.fail_on_warning && run.summary.warning_count > 0);
    if failed {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
