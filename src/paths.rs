//! On-disk layout shared by the project side and the external side
//!
//! ```text
//! <project>/.sync/config.json
//! <project>/.sync/snapshots/*.zip
//! <external>/snapshots/*.zip
//! <external>/.sync/history.json
//! ```

use std::path::{Path, PathBuf};

/// Metadata folder name, excluded from every snapshot
pub const METADATA_DIR: &str = ".sync";

/// Project config file name inside the metadata folder
pub const CONFIG_FILENAME: &str = "config.json";

/// Snapshot folder name (inside `.sync` locally, at the root externally)
pub const SNAPSHOTS_DIR: &str = "snapshots";

/// History log file name inside the external metadata folder
pub const HISTORY_FILENAME: &str = "history.json";

/// Snapshot archive extension
pub const SNAPSHOT_EXTENSION: &str = "zip";

pub fn metadata_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(METADATA_DIR)
}

pub fn config_path(project_dir: &Path) -> PathBuf {
    metadata_dir(project_dir).join(CONFIG_FILENAME)
}

pub fn local_snapshots_dir(project_dir: &Path) -> PathBuf {
    metadata_dir(project_dir).join(SNAPSHOTS_DIR)
}

pub fn external_snapshots_dir(external: &Path) -> PathBuf {
    external.join(SNAPSHOTS_DIR)
}

pub fn history_path(external: &Path) -> PathBuf {
    external.join(METADATA_DIR).join(HISTORY_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let project = Path::new("/work/demo");
        let usb = Path::new("/media/usb");
        assert_eq!(config_path(project), Path::new("/work/demo/.sync/config.json"));
        assert_eq!(local_snapshots_dir(project), Path::new("/work/demo/.sync/snapshots"));
        assert_eq!(external_snapshots_dir(usb), Path::new("/media/usb/snapshots"));
        assert_eq!(history_path(usb), Path::new("/media/usb/.sync/history.json"));
    }
}
