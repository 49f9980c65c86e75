//! synu commands
//!
//! Each command reloads its state from disk, runs one linear sequence of
//! filesystem steps and returns a report for the CLI to print. Running two
//! synu processes against the same project or external path at once is
//! unsupported: nothing is locked.

mod backup;
mod downgrade;
mod history;
mod init;
mod restore;

pub use backup::*;
pub use downgrade::*;
pub use history::*;
pub use init::*;
pub use restore::*;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result, SyncError};
use crate::models::ProjectConfig;
use crate::storage::config_store;

#[cfg(test)]
mod tests;

/// Resolve `--current` to the canonical project directory
///
/// `.` and `..` segments are collapsed so the last component is the real
/// directory name.
pub fn project_root(current: &Path) -> Result<PathBuf> {
    let root = fs::canonicalize(current).with_path("project directory not found at", current)?;
    if !root.is_dir() {
        return Err(SyncError::io(
            "project directory not found at",
            &root,
            io::Error::from(io::ErrorKind::NotFound),
        ));
    }
    Ok(root)
}

/// Initialized project plus the external path picked for this invocation
struct Target {
    config: ProjectConfig,
    external: PathBuf,
    remembered: bool,
}

/// Load the config, resolve the external path and persist it if supplied
fn open_target(project_dir: &Path, provided: Option<&Path>) -> Result<Target> {
    let mut config = config_store::require(project_dir)?;
    let resolved = config_store::resolve_external_path(&config, provided)?;
    let remembered = config_store::remember_external_path(project_dir, &mut config, &resolved)?;
    Ok(Target {
        config,
        external: resolved.path,
        remembered,
    })
}
