//! Configuration loading and management.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up at the workspace root.
pub const CONFIG_FILE_NAME: &str = "vue-migrate.json";

pub const DEFAULT_TEMPLATE_DIR: &str = "backbone/templates/components";
pub const DEFAULT_VIEW_DIR: &str = "backbone/views/components";
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "html";
pub const DEFAULT_COMPANION_EXTENSION: &str = "js";

const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**", "**/.git/**"];

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Contents of `vue-migrate.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub template_dir: Option<PathBuf>,
    pub view_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub template_extension: Option<String>,
    pub companion_extension: Option<String>,
    pub ignore: Vec<String>,
}

impl ConfigFile {
    /// Load a config file.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config file contents.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Find the config file in a workspace.
    pub fn find(workspace: &Path) -> Option<PathBuf> {
        let path = workspace.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }
}

/// Configuration for vue-migrate.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace: PathBuf,
    /// Root scanned for templates.
    pub template_dir: PathBuf,
    /// Root holding the companion views.
    pub view_dir: PathBuf,
    /// Root the `.vue` files are written under.
    pub out_dir: PathBuf,
    /// Template file extension, without the dot.
    pub template_extension: String,
    /// Companion file extension, without the dot.
    pub companion_extension: String,
    /// Ignore patterns.
    pub ignore_patterns: Vec<String>,
    ignore_set: GlobSet,
}

impl Config {
    /// Load configuration from CLI arguments and workspace.
    ///
    /// CLI flags take precedence over the config file, which takes
    /// precedence over the defaults.
    pub fn load(workspace: &Path, args: &Args) -> Result<Self> {
        let config_path = args
            .config
            .as_ref()
            .map(|path| workspace.join(path))
            .or_else(|| ConfigFile::find(workspace));

        let file = match config_path {
            Some(ref path) => ConfigFile::load(path).into_diagnostic()?,
            None => ConfigFile::default(),
        };

        Self::resolve(workspace, args, file).into_diagnostic()
    }

    /// Merge CLI arguments over a parsed config file.
    pub fn resolve(
        workspace: &Path,
        args: &Args,
        file: ConfigFile,
    ) -> std::result::Result<Self, ConfigError> {
        let template_dir = args
            .templates
            .clone()
            .or(file.template_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR));
        let view_dir = args
            .views
            .clone()
            .or(file.view_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VIEW_DIR));
        let out_dir = args
            .out_dir
            .clone()
            .or(file.out_dir)
            .unwrap_or_else(|| template_dir.clone());

        let template_extension = normalize_extension(
            file.template_extension
                .as_deref()
                .unwrap_or(DEFAULT_TEMPLATE_EXTENSION),
        );
        let companion_extension = normalize_extension(
            file.companion_extension
                .as_deref()
                .unwrap_or(DEFAULT_COMPANION_EXTENSION),
        );

        let mut ignore_patterns: Vec<String> =
            DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();
        ignore_patterns.extend(file.ignore);
        ignore_patterns.extend(args.ignore.iter().cloned());
        let ignore_set = build_ignore_set(&ignore_patterns)?;

        Ok(Self {
            workspace: workspace.to_path_buf(),
            template_dir: workspace.join(template_dir),
            view_dir: workspace.join(view_dir),
            out_dir: workspace.join(out_dir),
            template_extension,
            companion_extension,
            ignore_patterns,
            ignore_set,
        })
    }

    /// Check if a file should be processed.
    pub fn should_process(&self, path: &Path) -> bool {
        let matches_extension = path
            .extension()
            .map(|ext| ext.to_string_lossy() == self.template_extension)
            .unwrap_or(false);
        if !matches_extension {
            return false;
        }

        let relative = path.strip_prefix(&self.workspace).unwrap_or(path);
        !self.ignore_set.is_match(relative)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_string()
}

fn build_ignore_set(patterns: &[String]) -> std::result::Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("vue-migrate").chain(extra.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(Path::new("/app"), &args(&[]), ConfigFile::default()).unwrap();
        assert_eq!(config.template_dir, Path::new("/app/backbone/templates/components"));
        assert_eq!(config.view_dir, Path::new("/app/backbone/views/components"));
        assert_eq!(config.out_dir, config.template_dir);
        assert_eq!(config.template_extension, "html");
        assert_eq!(config.companion_extension, "js");
    }

    #[test]
    fn test_config_file_camel_case() {
        let file = ConfigFile::parse(
            r#"{ "templateDir": "tpl", "outDir": "vue", "templateExtension": ".ejs", "ignore": ["**/old/**"] }"#,
        )
        .unwrap();
        assert_eq!(file.template_dir, Some(PathBuf::from("tpl")));
        assert_eq!(file.view_dir, None);

        let config = Config::resolve(Path::new("/app"), &args(&[]), file).unwrap();
        assert_eq!(config.template_dir, Path::new("/app/tpl"));
        assert_eq!(config.out_dir, Path::new("/app/vue"));
        assert_eq!(config.template_extension, "ejs");
        assert!(config.ignore_patterns.contains(&"**/old/**".to_string()));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigFile {
            template_dir: Some("from-file".into()),
            view_dir: Some("views-from-file".into()),
            ..Default::default()
        };
        let config =
            Config::resolve(Path::new("/app"), &args(&["--templates", "from-cli"]), file).unwrap();
        assert_eq!(config.template_dir, Path::new("/app/from-cli"));
        assert_eq!(config.view_dir, Path::new("/app/views-from-file"));
        assert_eq!(config.out_dir, Path::new("/app/from-cli"));
    }

    #[test]
    fn test_should_process() {
        let config = Config::resolve(
            Path::new("/app"),
            &args(&["--ignore", "backbone/templates/components/legacy/**"]),
            ConfigFile::default(),
        )
        .unwrap();
        let root = Path::new("/app/backbone/templates/components");
        assert!(config.should_process(&root.join("coupon.html")));
        assert!(!config.should_process(&root.join("Coupon.vue")));
        assert!(!config.should_process(&root.join("legacy/old.html")));
        assert!(!config.should_process(&root.join("node_modules/pkg/a.html")));
    }

    #[test]
    fn test_invalid_glob() {
        let err = Config::resolve(Path::new("/app"), &args(&["--ignore", "a[b"]), ConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    }

    #[test]
    fn test_load_finds_workspace_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "viewDir": "js/views" }"#).unwrap();
        let config = Config::load(dir.path(), &args(&[])).unwrap();
        assert_eq!(config.view_dir, dir.path().join("js/views"));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(Config::load(dir.path(), &args(&[])).is_err());
    }
}
