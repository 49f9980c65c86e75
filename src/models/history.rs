//! History log entry model

use serde::{Deserialize, Serialize};

/// One record of `<external>/.sync/history.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Snapshot archive file name
    pub snapshot: String,
    /// Message given to `backup -m`
    pub message: String,
    /// `YYYYMMDD_HHMMSS` timestamp embedded in the snapshot name
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(
        snapshot: impl Into<String>,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            snapshot: snapshot.into(),
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }
}
