//! `synu downgrade`

use std::path::Path;

use super::{open_target, RestoreReport};
use crate::archive;
use crate::error::{Result, SyncError};
use crate::models::validate_snapshot_name;
use crate::paths;

/// Extract the named external snapshot into the project
///
/// Fails with `SnapshotNotFound` before touching the project when the
/// archive does not exist. A malformed `snap` is rejected before `--path`
/// is remembered.
pub fn downgrade(project_dir: &Path, path: Option<&Path>, snap: &str) -> Result<RestoreReport> {
    validate_snapshot_name(snap)?;
    let target = open_target(project_dir, path)?;

    let archive_path = paths::external_snapshots_dir(&target.external).join(snap);
    if !archive_path.is_file() {
        return Err(SyncError::SnapshotNotFound(snap.to_string()));
    }

    log::debug!("Restoring snapshot {}", archive_path.display());
    let stats = archive::extract_snapshot(&archive_path, project_dir)?;
    Ok(RestoreReport {
        snapshot: snap.to_string(),
        external_path: target.external,
        remembered_path: target.remembered,
        stats,
    })
}
