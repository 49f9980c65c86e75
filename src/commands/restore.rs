//! `synu restore`

use std::fs;
use std::path::{Path, PathBuf};

use super::open_target;
use crate::archive::{self, ExtractStats};
use crate::error::{IoResultExt, Result, SyncError};
use crate::models::is_snapshot_file_name;
use crate::paths;

/// Result of `restore` and `downgrade`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// Snapshot that was extracted
    pub snapshot: String,
    /// Absolute external path the snapshot came from
    pub external_path: PathBuf,
    /// Whether `--path` replaced the remembered external path
    pub remembered_path: bool,
    /// Extraction statistics
    pub stats: ExtractStats,
}

/// Extract the most recent external snapshot into the project
///
/// "Most recent" is the lexicographically greatest archive name, which the
/// timestamped naming scheme makes the newest one.
pub fn restore(project_dir: &Path, path: Option<&Path>) -> Result<RestoreReport> {
    let target = open_target(project_dir, path)?;
    let snapshots_dir = paths::external_snapshots_dir(&target.external);

    let snapshot = list_snapshots(&snapshots_dir)?
        .pop()
        .ok_or(SyncError::NoSnapshotsFound)?;

    log::debug!("Restoring latest snapshot {}", snapshot);
    let stats = archive::extract_snapshot(&snapshots_dir.join(&snapshot), project_dir)?;
    Ok(RestoreReport {
        snapshot,
        external_path: target.external,
        remembered_path: target.remembered,
        stats,
    })
}

/// Snapshot archive names in `dir`, sorted ascending
///
/// A missing directory yields an empty list. Non-archive entries
/// (and names that are not valid UTF-8) are ignored.
pub fn list_snapshots(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_path("failed to list", dir)? {
        let entry = entry.with_path("failed to list", dir)?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_snapshot_file_name(&name) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
