//! Project config data model
//!
//! Defines the `.sync/config.json` descriptor written by `init`.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Fallback name when the project path has no final component (e.g. `/`)
const UNKNOWN_PROJECT: &str = "project";

/// Per-project descriptor stored at `<project>/.sync/config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectConfig {
    /// Project name (directory name at init time), used as snapshot prefix
    pub project_name: String,
    /// Project identifier (UUID v4), generated once at init
    pub identifier: String,
    /// Remembered external path; empty until a `--path` is first supplied
    #[serde(default)]
    pub usb_path: String,
}

impl ProjectConfig {
    /// Create a fresh config for the project rooted at `project_dir`
    pub fn new(project_dir: &Path) -> Self {
        Self {
            project_name: extract_project_name(project_dir),
            identifier: uuid::Uuid::new_v4().to_string(),
            usb_path: String::new(),
        }
    }

    /// Remembered external path, if any
    pub fn external_path(&self) -> Option<&Path> {
        if self.usb_path.is_empty() {
            None
        } else {
            Some(Path::new(&self.usb_path))
        }
    }
}

/// Extract the project name from its directory path
///
/// Trailing separators are ignored; a path without a final
/// component falls back to a generic name.
pub fn extract_project_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}
