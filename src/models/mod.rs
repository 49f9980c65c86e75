//! Data models for synu
//!
//! Defines the persisted project config, history entries and
//! the snapshot naming scheme.

pub mod config;
pub mod history;
pub mod snapshot;

pub use config::{extract_project_name, ProjectConfig};
pub use history::HistoryEntry;
pub use snapshot::{is_snapshot_file_name, validate_snapshot_name, SnapshotName, TIMESTAMP_FORMAT};
