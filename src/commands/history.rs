//! `synu log`

use std::path::{Path, PathBuf};

use super::open_target;
use crate::error::Result;
use crate::models::HistoryEntry;
use crate::storage::history_log;

/// Result of `log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryReport {
    /// External path the history was read from
    pub external_path: PathBuf,
    /// Entries, newest first
    pub entries: Vec<HistoryEntry>,
}

/// Read the history log of the external path, newest entry first
pub fn history(project_dir: &Path, path: Option<&Path>) -> Result<HistoryReport> {
    let target = open_target(project_dir, path)?;
    let mut entries = history_log::load(&target.external)?;
    entries.reverse();
    Ok(HistoryReport {
        external_path: target.external,
        entries,
    })
}
