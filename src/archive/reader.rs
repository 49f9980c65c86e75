//! 快照解压
//!
//! 把归档中的每个条目解压到目标目录，按相对路径覆盖同名文件，不做确认也不做备份。

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::writer::is_excluded;
use crate::error::{IoResultExt, Result, SyncError};

/// 解压统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// 创建的目录数
    pub directories: usize,
    /// 写出的文件数
    pub files: usize,
    /// 跳过的 `.sync` 条目数
    pub skipped: usize,
}

/// 将快照解压到 `target_dir`
///
/// 所有条目名先经过校验：绝对路径或含 `..` 越出目标目录的条目
/// 直接报错 `UnsafeArchiveEntry`，此时尚未写出任何文件。
pub fn extract_snapshot(archive_path: &Path, target_dir: &Path) -> Result<ExtractStats> {
    let file = File::open(archive_path).with_path("failed to open", archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| SyncError::UnsafeArchiveEntry(entry.name().to_string()))?;
        entries.push((index, relative));
    }

    let mut stats = ExtractStats::default();
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for (index, relative) in entries {
        if is_excluded(&relative) {
            log::warn!("Skipping metadata entry {}", relative.display());
            stats.skipped += 1;
            continue;
        }

        let mut entry = archive.by_index(index)?;
        let out = target_dir.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out).with_path("failed to create directory", &out)?;
            if let Some(mode) = entry.unix_mode() {
                dir_modes.push((out, mode));
            }
            stats.directories += 1;
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).with_path("failed to create directory", parent)?;
        }
        remove_existing(&out)?;
        let mut writer = File::create(&out).with_path("failed to create", &out)?;
        io::copy(&mut entry, &mut writer).with_path("failed to extract", &out)?;
        if let Some(mode) = entry.unix_mode() {
            apply_mode(&out, mode)?;
        }
        stats.files += 1;
    }

    // 目录权限最后设置，避免只读目录挡住其中文件的写入
    for (dir, mode) in dir_modes.iter().rev() {
        apply_mode(dir, *mode)?;
    }

    log::info!(
        "Extracted {} into {}: {} dirs, {} files",
        archive_path.display(),
        target_dir.display(),
        stats.directories,
        stats.files
    );
    Ok(stats)
}

/// 删除已存在的同名文件，只读文件也能被覆盖
fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if !meta.is_dir() => fs::remove_file(path).with_path("failed to replace", path),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if mode & 0o7777 == 0 {
        return Ok(());
    }
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .with_path("failed to set permissions on", path)
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
