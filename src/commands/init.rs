//! `synu init`

use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::models::ProjectConfig;
use crate::paths;
use crate::storage::config_store;

/// Result of `init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// `.sync` was created with this config
    Initialized(ProjectConfig),
    /// `.sync` already existed; nothing was written
    AlreadyInitialized,
}

/// Create `.sync`, `.sync/snapshots` and a fresh config
///
/// Idempotent: an existing `.sync` directory is left untouched.
pub fn init(project_dir: &Path) -> Result<InitOutcome> {
    let metadata_dir = paths::metadata_dir(project_dir);
    if metadata_dir.exists() {
        log::info!("{} already exists, skipping init", metadata_dir.display());
        return Ok(InitOutcome::AlreadyInitialized);
    }

    let snapshots_dir = paths::local_snapshots_dir(project_dir);
    fs::create_dir_all(&snapshots_dir).with_path("failed to create directory", &snapshots_dir)?;

    let config = ProjectConfig::new(project_dir);
    config_store::save(project_dir, &config)?;
    log::info!(
        "Initialized project {} ({}) in {}",
        config.project_name,
        config.identifier,
        project_dir.display()
    );
    Ok(InitOutcome::Initialized(config))
}
