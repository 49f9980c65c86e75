//! 快照写入
//!
//! 递归遍历项目目录生成 ZIP：
//! - 每个目录 (根目录除外) 写入以 `/` 结尾的零长度条目，保证空目录能被恢复
//! - 空文件写入零长度条目
//! - 其余文件以 deflate 压缩写入
//! - 任一路径段等于 `.sync` 的子树整体跳过 (按路径段精确匹配，`resync` 不受影响)

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Seek, Write};
use std::path::{Component, Path};

use chrono::{DateTime, Datelike, Local, Timelike};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::result::ZipError;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{IoResultExt, Result};
use crate::paths::METADATA_DIR;
use crate::services::atomic_fs;

/// 归档统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// 目录条目数
    pub directories: usize,
    /// 非空文件数
    pub files: usize,
    /// 空文件数
    pub empty_files: usize,
    /// 跳过的符号链接及特殊文件数
    pub skipped: usize,
    /// 写入的原始字节数
    pub bytes: u64,
}

/// 达到此大小的文件需要 ZIP64 扩展字段
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// 相对路径中是否有路径段等于元数据目录名
pub fn is_excluded(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == METADATA_DIR))
}

/// 为 `project_dir` 生成快照归档
///
/// 归档先写入 `destination` 同目录的临时文件，成功后重命名，
/// 失败时不会留下写了一半的归档。
///
/// # Arguments
/// * `project_dir` - 项目根目录
/// * `destination` - 归档输出路径
pub fn create_snapshot(project_dir: &Path, destination: &Path) -> Result<ArchiveStats> {
    let stats = atomic_fs::atomic_create(destination, |file| {
        write_archive(project_dir, BufWriter::new(file))
    })?;
    log::info!(
        "Archived {} into {}: {} dirs, {} files ({} empty), {} bytes",
        project_dir.display(),
        destination.display(),
        stats.directories,
        stats.files + stats.empty_files,
        stats.empty_files,
        stats.bytes
    );
    Ok(stats)
}

fn write_archive<W: Write + Seek>(project_dir: &Path, sink: W) -> Result<ArchiveStats> {
    let mut zip = ZipWriter::new(sink);
    let mut stats = ArchiveStats::default();

    let walker = WalkDir::new(project_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != METADATA_DIR);

    for entry in walker {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(project_dir) else {
            continue;
        };
        let name = entry_name(relative);
        let file_type = entry.file_type();

        if !file_type.is_dir() && !file_type.is_file() {
            log::warn!("Skipping {} (symbolic link or special file)", name);
            stats.skipped += 1;
            continue;
        }

        let metadata = entry.metadata()?;
        let options = entry_options(&metadata);

        if file_type.is_dir() {
            zip.add_directory(
                format!("{name}/"),
                options.compression_method(CompressionMethod::Stored),
            )?;
            stats.directories += 1;
        } else if metadata.len() == 0 {
            zip.start_file(name, options.compression_method(CompressionMethod::Stored))?;
            stats.empty_files += 1;
        } else {
            let options = options
                .compression_method(CompressionMethod::Deflated)
                .large_file(needs_zip64(metadata.len()));
            zip.start_file(name, options)?;
            let mut reader =
                BufReader::new(File::open(entry.path()).with_path("failed to open", entry.path())?);
            stats.bytes +=
                io::copy(&mut reader, &mut zip).with_path("failed to archive", entry.path())?;
            stats.files += 1;
        }
    }

    zip.finish()?.flush().map_err(ZipError::Io)?;
    Ok(stats)
}

fn needs_zip64(len: u64) -> bool {
    len >= ZIP64_THRESHOLD
}

/// 归档内的条目名：相对路径，统一使用 `/` 分隔
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn entry_options(metadata: &fs::Metadata) -> SimpleFileOptions {
    let mut options = SimpleFileOptions::default().unix_permissions(permission_bits(metadata));
    if let Some(modified) = metadata.modified().ok().and_then(zip_time) {
        options = options.last_modified_time(modified);
    }
    options
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

/// ZIP 时间戳只能表示 1980-2107 年，超出范围时不记录
fn zip_time(time: std::time::SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = time.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}
