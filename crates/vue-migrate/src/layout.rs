//! Mapping template paths to component names, views and outputs.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// The three directory roots a migration works across.
#[derive(Debug, Clone)]
pub struct Layout {
    template_root: PathBuf,
    view_root: PathBuf,
    out_root: PathBuf,
    companion_extension: String,
}

impl Layout {
    pub fn new(
        template_root: impl Into<PathBuf>,
        view_root: impl Into<PathBuf>,
        out_root: impl Into<PathBuf>,
        companion_extension: impl Into<String>,
    ) -> Self {
        Self {
            template_root: template_root.into(),
            view_root: view_root.into(),
            out_root: out_root.into(),
            companion_extension: companion_extension.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.template_dir,
            &config.view_dir,
            &config.out_dir,
            &config.companion_extension,
        )
    }

    /// The companion view of a template: same relative directory under the
    /// views root, named `<Name>.<companion extension>`.
    pub fn companion_path(&self, template: &Path, name: &str) -> PathBuf {
        self.view_root
            .join(self.relative_dir(template))
            .join(format!("{}.{}", name, self.companion_extension))
    }

    /// Where the component's `.vue` file goes.
    pub fn output_path(&self, template: &Path, name: &str) -> PathBuf {
        self.out_root
            .join(self.relative_dir(template))
            .join(format!("{name}.vue"))
    }

    fn relative_dir<'a>(&self, template: &'a Path) -> &'a Path {
        template
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.template_root).ok())
            .unwrap_or_else(|| Path::new(""))
    }
}

/// Component name of a template: its file stem with the first letter
/// uppercased.
pub fn component_name(template: &Path) -> Option<String> {
    let stem = template.file_stem()?.to_str()?;
    let mut chars = stem.chars();
    let first = chars.next()?;
    Some(first.to_ascii_uppercase().to_string() + chars.as_str())
}
