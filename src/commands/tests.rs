use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use super::*;
use crate::error::SyncError;
use crate::storage::{config_store, history_log};

/// Project directory named `demo` plus a separate "USB" directory
struct Fixture {
    _root: TempDir,
    project: PathBuf,
    usb: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let project = root.path().join("demo");
        let usb = root.path().join("usb");
        fs::create_dir_all(project.join("src")).unwrap();
        fs::create_dir_all(project.join("assets/empty")).unwrap();
        fs::create_dir_all(&usb).unwrap();
        fs::write(project.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(project.join("notes.txt"), "v1").unwrap();
        fs::write(project.join("blank.txt"), "").unwrap();
        Self {
            _root: root,
            project,
            usb,
        }
    }

    fn initialized() -> Self {
        let fixture = Self::new();
        init(&fixture.project).unwrap();
        fixture
    }

    fn external_snapshots(&self) -> Vec<String> {
        list_snapshots(&self.usb.join("snapshots")).unwrap()
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn test_init_creates_metadata() {
    let fixture = Fixture::new();

    let outcome = init(&fixture.project).unwrap();

    let InitOutcome::Initialized(config) = outcome else {
        panic!("expected a fresh init");
    };
    assert_eq!(config.project_name, "demo");
    assert!(!config.identifier.is_empty());
    assert!(config.usb_path.is_empty());
    assert!(fixture.project.join(".sync/snapshots").is_dir());
    assert_eq!(config_store::load(&fixture.project).unwrap(), Some(config));
}

#[test]
fn test_init_is_idempotent() {
    let fixture = Fixture::initialized();
    let config_path = fixture.project.join(".sync/config.json");
    let before = fs::read(&config_path).unwrap();

    let outcome = init(&fixture.project).unwrap();

    assert_eq!(outcome, InitOutcome::AlreadyInitialized);
    assert_eq!(fs::read(&config_path).unwrap(), before);
}

#[test]
fn test_commands_require_init() {
    let fixture = Fixture::new();

    assert!(matches!(
        backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)),
        Err(SyncError::NotInitialized)
    ));
    assert!(matches!(
        restore(&fixture.project, Some(fixture.usb.as_path())),
        Err(SyncError::NotInitialized)
    ));
    assert!(matches!(
        downgrade(&fixture.project, Some(fixture.usb.as_path()), "demo_20240501_120000.zip"),
        Err(SyncError::NotInitialized)
    ));
    assert!(matches!(
        history(&fixture.project, Some(fixture.usb.as_path())),
        Err(SyncError::NotInitialized)
    ));
}

#[test]
fn test_backup_requires_external_path_first_time() {
    let fixture = Fixture::initialized();

    let result = backup(&fixture.project, None, "first", at(12, 0, 0));

    assert!(matches!(result, Err(SyncError::NoExternalPathConfigured)));
    assert!(fixture.external_snapshots().is_empty());
}

#[test]
fn test_backup_scenario() {
    let fixture = Fixture::initialized();

    let first = backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();

    assert_eq!(first.snapshot, "demo_20240501_120000.zip");
    assert!(first.remembered_path);
    assert!(first.local_archive.is_file());
    assert_eq!(fixture.external_snapshots(), vec![first.snapshot.clone()]);
    let entries = history_log::load(&fixture.usb).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "first");
    assert_eq!(entries[0].timestamp, "20240501_120000");

    // second backup reuses the remembered path
    let second = backup(&fixture.project, None, "second", at(12, 30, 0)).unwrap();

    assert!(!second.remembered_path);
    let entries = history_log::load(&fixture.usb).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].snapshot, first.snapshot);
    assert_eq!(entries[0].message, "first");
    assert_eq!(entries[1].snapshot, second.snapshot);
    assert_eq!(entries[1].message, "second");
    assert!(entries[0].snapshot < entries[1].snapshot);
}

#[test]
fn test_backup_remembers_absolute_path() {
    let fixture = Fixture::initialized();

    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();

    let config = config_store::require(&fixture.project).unwrap();
    assert!(Path::new(&config.usb_path).is_absolute());
    assert_eq!(Path::new(&config.usb_path), fixture.usb.as_path());
}

#[test]
fn test_backup_new_path_replaces_remembered_one() {
    let fixture = Fixture::initialized();
    let other_usb = fixture.usb.with_file_name("other_usb");

    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    let report = backup(&fixture.project, Some(other_usb.as_path()), "second", at(13, 0, 0)).unwrap();

    assert!(report.remembered_path);
    let config = config_store::require(&fixture.project).unwrap();
    assert_eq!(Path::new(&config.usb_path), other_usb.as_path());
    assert_eq!(history_log::load(&other_usb).unwrap().len(), 1);
    assert_eq!(history_log::load(&fixture.usb).unwrap().len(), 1);
}

#[test]
fn test_backup_same_second_does_not_overwrite() {
    let fixture = Fixture::initialized();

    let first = backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    let second = backup(&fixture.project, None, "second", at(12, 0, 0)).unwrap();

    assert_eq!(first.snapshot, "demo_20240501_120000.zip");
    assert_eq!(second.snapshot, "demo_20240501_120000_001.zip");
    assert_eq!(fixture.external_snapshots().len(), 2);
    let entries = history_log::load(&fixture.usb).unwrap();
    assert_eq!(entries[1].timestamp, "20240501_120000");
}

#[test]
fn test_backup_excludes_metadata_dir() {
    let fixture = Fixture::initialized();

    let first = backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    let second = backup(&fixture.project, None, "second", at(12, 0, 1)).unwrap();

    // the second archive must not contain the first one
    let archive = fs::File::open(&second.external_archive).unwrap();
    let mut zip = zip::ZipArchive::new(archive).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.iter().all(|n| !n.starts_with(".sync")));
    assert!(!names.iter().any(|n| n.contains(&first.snapshot)));
}

#[cfg(unix)]
#[test]
fn test_failed_history_write_rolls_back_archives() {
    let fixture = Fixture::initialized();
    // a directory where history.json should be makes the history write fail
    fs::create_dir_all(fixture.usb.join(".sync/history.json")).unwrap();

    let result = backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0));

    assert!(result.is_err());
    assert!(fixture.external_snapshots().is_empty());
    assert!(list_snapshots(&fixture.project.join(".sync/snapshots"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_restore_picks_latest_snapshot() {
    let fixture = Fixture::initialized();
    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    fs::write(fixture.project.join("notes.txt"), "v2").unwrap();
    let latest = backup(&fixture.project, None, "second", at(13, 0, 0)).unwrap();
    fs::write(fixture.project.join("notes.txt"), "v3").unwrap();
    fs::remove_dir_all(fixture.project.join("assets")).unwrap();

    let report = restore(&fixture.project, None).unwrap();

    assert_eq!(report.snapshot, latest.snapshot);
    assert_eq!(fs::read_to_string(fixture.project.join("notes.txt")).unwrap(), "v2");
    assert!(fixture.project.join("assets/empty").is_dir());
    assert_eq!(fs::read(fixture.project.join("blank.txt")).unwrap(), b"");
}

#[test]
fn test_restore_ignores_non_archive_files() {
    let fixture = Fixture::initialized();
    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    fs::write(fixture.usb.join("snapshots/zzz_notes.txt"), "not a snapshot").unwrap();

    let report = restore(&fixture.project, None).unwrap();

    assert_eq!(report.snapshot, "demo_20240501_120000.zip");
}

#[test]
fn test_restore_without_snapshots() {
    let fixture = Fixture::initialized();
    fs::write(fixture.project.join("notes.txt"), "local edit").unwrap();

    let result = restore(&fixture.project, Some(fixture.usb.as_path()));

    assert!(matches!(result, Err(SyncError::NoSnapshotsFound)));
    assert_eq!(
        fs::read_to_string(fixture.project.join("notes.txt")).unwrap(),
        "local edit"
    );

    fs::create_dir_all(fixture.usb.join("snapshots")).unwrap();
    assert!(matches!(
        restore(&fixture.project, None),
        Err(SyncError::NoSnapshotsFound)
    ));
}

#[test]
fn test_downgrade_to_named_snapshot() {
    let fixture = Fixture::initialized();
    let first = backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    fs::write(fixture.project.join("notes.txt"), "v2").unwrap();
    backup(&fixture.project, None, "second", at(13, 0, 0)).unwrap();

    let report = downgrade(&fixture.project, None, &first.snapshot).unwrap();

    assert_eq!(report.snapshot, first.snapshot);
    assert_eq!(fs::read_to_string(fixture.project.join("notes.txt")).unwrap(), "v1");
}

#[test]
fn test_downgrade_unknown_snapshot_leaves_project_untouched() {
    let fixture = Fixture::initialized();
    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    fs::write(fixture.project.join("notes.txt"), "local edit").unwrap();

    let result = downgrade(&fixture.project, None, "demo_19990101_000000.zip");

    assert!(matches!(
        result,
        Err(SyncError::SnapshotNotFound(name)) if name == "demo_19990101_000000.zip"
    ));
    assert_eq!(
        fs::read_to_string(fixture.project.join("notes.txt")).unwrap(),
        "local edit"
    );
}

#[test]
fn test_downgrade_rejects_paths() {
    let fixture = Fixture::initialized();
    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();

    let result = downgrade(&fixture.project, None, "../demo/.sync/config.json");

    assert!(matches!(result, Err(SyncError::InvalidSnapshotName(_))));
}

#[test]
fn test_history_newest_first() {
    let fixture = Fixture::initialized();
    backup(&fixture.project, Some(fixture.usb.as_path()), "first", at(12, 0, 0)).unwrap();
    backup(&fixture.project, None, "second", at(13, 0, 0)).unwrap();

    let report = history(&fixture.project, None).unwrap();

    assert_eq!(report.external_path, fixture.usb);
    let messages: Vec<_> = report.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["second", "first"]);
}

#[test]
fn test_project_root() {
    let fixture = Fixture::new();
    let root = project_root(&fixture.project).unwrap();
    assert!(root.is_absolute());
    assert!(project_root(&fixture.project.join("missing")).is_err());
    assert!(project_root(&fixture.project.join("notes.txt")).is_err());
}

#[test]
fn test_project_root_collapses_parent_segments() {
    let fixture = Fixture::new();

    let root = project_root(&fixture.project.join("src").join("..")).unwrap();

    assert_eq!(root.file_name().unwrap(), "demo");
    let InitOutcome::Initialized(config) = init(&root).unwrap() else {
        panic!("expected a fresh init");
    };
    assert_eq!(config.project_name, "demo");
    assert!(fixture.project.join(".sync/config.json").is_file());
}

#[test]
fn test_backup_report_carries_absolute_external_path() {
    let fixture = Fixture::initialized();
    let relative_usb = fixture.usb.join("..").join("usb");

    let report = backup(&fixture.project, Some(relative_usb.as_path()), "first", at(12, 0, 0)).unwrap();

    assert!(report.external_path.is_absolute());
    assert_eq!(report.external_path, std::path::absolute(&relative_usb).unwrap());
    let restored = restore(&fixture.project, None).unwrap();
    assert_eq!(restored.external_path, report.external_path);
}

#[test]
fn test_downgrade_invalid_name_does_not_remember_path() {
    let fixture = Fixture::initialized();

    let result = downgrade(&fixture.project, Some(fixture.usb.as_path()), "../escape.zip");

    assert!(matches!(result, Err(SyncError::InvalidSnapshotName(_))));
    let config = config_store::require(&fixture.project).unwrap();
    assert!(config.usb_path.is_empty());
}
