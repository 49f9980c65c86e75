//! `synu backup`
//!
//! Ordered steps: archive locally, copy to the external path, append history.
//! Files created by earlier steps are removed again if a later step fails.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::open_target;
use crate::archive::{self, ArchiveStats};
use crate::error::Result;
use crate::models::{HistoryEntry, SnapshotName};
use crate::paths;
use crate::services::{atomic_fs, BackupGuard};
use crate::storage::history_log;

/// Result of `backup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// Snapshot file name
    pub snapshot: String,
    /// Local archive path
    pub local_archive: PathBuf,
    /// Copy on the external path
    pub external_archive: PathBuf,
    /// Absolute external path the backup went to
    pub external_path: PathBuf,
    /// Whether `--path` replaced the remembered external path
    pub remembered_path: bool,
    /// Archive statistics
    pub stats: ArchiveStats,
}

/// Snapshot the project and mirror it to the external path
///
/// # Arguments
/// * `project_dir` - absolute project directory
/// * `path` - `--path`, overriding (and replacing) the remembered external path
/// * `message` - history message
/// * `now` - local time used for the snapshot name
pub fn backup(
    project_dir: &Path,
    path: Option<&Path>,
    message: &str,
    now: NaiveDateTime,
) -> Result<BackupReport> {
    let target = open_target(project_dir, path)?;
    let local_dir = paths::local_snapshots_dir(project_dir);
    let external_dir = paths::external_snapshots_dir(&target.external);

    let name = unique_snapshot_name(
        &target.config.project_name,
        now,
        &[local_dir.as_path(), external_dir.as_path()],
    );
    let snapshot = name.file_name();
    let local_archive = local_dir.join(&snapshot);
    let external_archive = external_dir.join(&snapshot);

    let mut guard = BackupGuard::new();

    log::debug!("Creating {}", local_archive.display());
    let stats = archive::create_snapshot(project_dir, &local_archive)?;
    guard.track(&local_archive);

    log::debug!("Copying snapshot to {}", external_archive.display());
    let bytes = atomic_fs::atomic_copy(&local_archive, &external_archive)?;
    guard.track(&external_archive);

    history_log::append(
        &target.external,
        HistoryEntry::new(snapshot.as_str(), message, name.timestamp()),
    )?;
    guard.commit();

    log::info!(
        "Backup {} complete ({} bytes copied to {})",
        snapshot,
        bytes,
        target.external.display()
    );
    Ok(BackupReport {
        snapshot,
        local_archive,
        external_archive,
        external_path: target.external,
        remembered_path: target.remembered,
        stats,
    })
}

/// First name for `now` that exists in none of `dirs`
///
/// Backups within the same second get `_001`, `_002`, ... suffixes.
fn unique_snapshot_name(project: &str, now: NaiveDateTime, dirs: &[&Path]) -> SnapshotName {
    let base = SnapshotName::new(project, now);
    let mut sequence = 0;
    loop {
        let candidate = base.with_sequence(sequence);
        let file_name = candidate.file_name();
        if dirs.iter().all(|dir| !dir.join(&file_name).exists()) {
            if sequence > 0 {
                log::warn!(
                    "Snapshot {} already exists, using {}",
                    base.file_name(),
                    file_name
                );
            }
            return candidate;
        }
        sequence += 1;
    }
}
