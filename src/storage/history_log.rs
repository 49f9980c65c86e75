//! History log on the external path
//!
//! `<external>/.sync/history.json` holds a JSON array of entries in
//! creation order. Entries are only ever appended.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::models::HistoryEntry;
use crate::paths;
use crate::services::atomic_fs;

/// Load every history entry; a missing file is an empty log
pub fn load(external: &Path) -> Result<Vec<HistoryEntry>> {
    let history_path = paths::history_path(external);
    match fs::read_to_string(&history_path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(SyncError::io("failed to read", &history_path, e)),
    }
}

/// Append one entry and rewrite the whole log
///
/// Not locked: two processes appending at once can lose an entry.
pub fn append(external: &Path, entry: HistoryEntry) -> Result<()> {
    let history_path = paths::history_path(external);
    let mut history = load(external)?;
    log::debug!(
        "Appending {} to {} ({} existing entries)",
        entry.snapshot,
        history_path.display(),
        history.len()
    );
    history.push(entry);
    atomic_fs::atomic_write_json(&history_path, &history)
}
