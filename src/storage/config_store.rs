//! Project config store
//!
//! Reads and writes `<project>/.sync/config.json`. Resolving the external
//! path is pure; persisting a user-supplied path is a separate, explicit step.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result, SyncError};
use crate::models::ProjectConfig;
use crate::paths;
use crate::services::atomic_fs;

/// External path chosen for one command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute external path
    pub path: PathBuf,
    /// True when it came from `--path` rather than the remembered config
    pub supplied: bool,
}

/// Load the project config
///
/// # Returns
/// `None` if `.sync/config.json` does not exist
pub fn load(project_dir: &Path) -> Result<Option<ProjectConfig>> {
    let config_path = paths::config_path(project_dir);
    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SyncError::io("failed to read", &config_path, e)),
    };
    Ok(Some(serde_json::from_str(&content)?))
}

/// Load the project config, failing with `NotInitialized` when absent
pub fn require(project_dir: &Path) -> Result<ProjectConfig> {
    load(project_dir)?.ok_or(SyncError::NotInitialized)
}

/// Save the project config, creating `.sync` if needed
pub fn save(project_dir: &Path, config: &ProjectConfig) -> Result<()> {
    let config_path = paths::config_path(project_dir);
    log::debug!("Writing project config to {}", config_path.display());
    atomic_fs::atomic_write_json(&config_path, config)
}

/// Pick the external path for this invocation
///
/// A provided path wins and is made absolute; otherwise the remembered
/// one is used. Nothing is written to disk here.
pub fn resolve_external_path(
    config: &ProjectConfig,
    provided: Option<&Path>,
) -> Result<ResolvedPath> {
    if let Some(provided) = provided {
        let path = std::path::absolute(provided).with_path("failed to resolve", provided)?;
        return Ok(ResolvedPath {
            path,
            supplied: true,
        });
    }

    config
        .external_path()
        .map(|path| ResolvedPath {
            path: path.to_path_buf(),
            supplied: false,
        })
        .ok_or(SyncError::NoExternalPathConfigured)
}

/// Persist a user-supplied external path into the config
///
/// Remembered paths and unchanged values are left alone.
///
/// # Returns
/// Whether the config file was rewritten
pub fn remember_external_path(
    project_dir: &Path,
    config: &mut ProjectConfig,
    resolved: &ResolvedPath,
) -> Result<bool> {
    let value = resolved.path.to_string_lossy();
    if !resolved.supplied || config.usb_path == value {
        return Ok(false);
    }
    log::info!(
        "Remembering external path {} (was {:?})",
        value,
        config.usb_path
    );
    config.usb_path = value.into_owned();
    save(project_dir, config)?;
    Ok(true)
}
