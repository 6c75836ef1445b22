//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Migrate Backbone templates and views into Vue single file components
#[derive(Parser, Debug, Clone)]
#[command(name = "vue-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Workspace directory (defaults to the current directory)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Path to vue-migrate.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Templates root, relative to the workspace
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Views root, relative to the workspace
    #[arg(long)]
    pub views: Option<PathBuf>,

    /// Output root, relative to the workspace (defaults to the templates root)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Report what would be written without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Fail on warnings
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for migration reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// Human-readable with rule and binding details
    HumanVerbose,
    /// JSON output, one object per line
    Json,
    /// Machine-readable output
    Machine,
}

impl Args {
    /// Check if output should be verbose.
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(self.output, OutputFormat::HumanVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "vue-migrate",
            "--workspace",
            "/tmp/app",
            "--ignore",
            "**/legacy/**",
            "--ignore",
            "**/old/**",
            "--output",
            "json",
            "--dry-run",
        ]);
        assert_eq!(args.workspace, Some(PathBuf::from("/tmp/app")));
        assert_eq!(args.ignore.len(), 2);
        assert_eq!(args.output, OutputFormat::Json);
        assert!(args.dry_run);
        assert!(!args.is_verbose());
    }

    #[test]
    fn test_human_verbose_is_verbose() {
        let args = Args::parse_from(["vue-migrate", "--output", "human-verbose"]);
        assert!(args.is_verbose());
    }
}
