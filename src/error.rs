//! Unified application error types
//!
//! Provides a single error type for every synu operation,
//! rendered as a one-line message by the CLI.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum SyncError {
    /// The project has no `.sync/config.json`
    #[error("this project is not initialized, run `synu init` first")]
    NotInitialized,

    /// No `--path` given and none remembered in the project config
    #[error("no external path configured, pass `--path` the first time")]
    NoExternalPathConfigured,

    /// The external snapshot directory is missing or holds no archives
    #[error("no snapshots found on the external path")]
    NoSnapshotsFound,

    /// The snapshot requested by `downgrade` does not exist
    #[error("snapshot '{0}' not found on the external path")]
    SnapshotNotFound(String),

    /// The snapshot name is not a bare file name
    #[error("invalid snapshot name '{0}'")]
    InvalidSnapshotName(String),

    /// An archive entry would land outside the extraction directory
    #[error("archive entry '{0}' escapes the target directory")]
    UnsafeArchiveEntry(String),

    /// File operation error, with the path it concerns
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("invalid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// ZIP read/write error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Directory walk error
    #[error("failed to walk project tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(context: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attach a context and path to `io::Result`s
pub trait IoResultExt<T> {
    fn with_path(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| SyncError::io(context, path, e))
    }
}
