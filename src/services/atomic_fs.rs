//! 原子文件操作模块
//!
//! 提供原子性文件复制和写入操作，确保在操作失败时不会留下写了一半的文件。
//! 使用 tempfile + atomic rename 模式：临时文件建在目标目录中，成功后 persist 到目标路径。

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{IoResultExt, Result, SyncError};

/// 在目标目录创建临时文件
fn temp_file_beside(path: &Path) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_path("failed to create directory", parent)?;
    NamedTempFile::new_in(parent).with_path("failed to create temp file in", parent)
}

/// 将临时文件原子重命名为目标路径
///
/// rename 在同一文件系统上是原子操作；失败时临时文件随 drop 自动清理
fn persist(temp: NamedTempFile, path: &Path) -> Result<()> {
    temp.persist(path)
        .map_err(|e| SyncError::io("failed to move temp file to", path, e.error))?;
    Ok(())
}

/// 原子写入文件
///
/// # Arguments
/// * `path` - 目标文件路径 (父目录不存在时自动创建)
/// * `content` - 要写入的字节内容
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let mut temp = temp_file_beside(path)?;
    temp.write_all(content)
        .and_then(|_| temp.as_file().sync_all())
        .with_path("failed to write", path)?;
    persist(temp, path)
}

/// 原子写入 JSON
///
/// 使用 4 空格缩进的格式化输出
pub fn atomic_write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    atomic_write(path, &to_pretty_json(value)?)
}

/// 序列化为 4 空格缩进的 JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// 原子复制文件
///
/// 复制到目标目录中的临时文件后再重命名，目标路径上要么是完整副本，要么不存在。
///
/// # Returns
/// 复制的字节数
pub fn atomic_copy(src: &Path, dst: &Path) -> Result<u64> {
    let mut reader = File::open(src).with_path("failed to open", src)?;
    let temp = temp_file_beside(dst)?;
    let bytes = {
        let mut writer = BufWriter::new(temp.as_file());
        let bytes = io::copy(&mut reader, &mut writer).with_path("failed to copy to", dst)?;
        writer.flush().with_path("failed to copy to", dst)?;
        bytes
    };
    temp.as_file().sync_all().with_path("failed to copy to", dst)?;
    persist(temp, dst)?;
    Ok(bytes)
}

/// 以原子方式生成文件：回调向临时文件写入内容，成功后重命名到目标路径
///
/// 回调失败时目标路径保持原样，临时文件被删除
pub fn atomic_create<T>(path: &Path, write: impl FnOnce(File) -> Result<T>) -> Result<T> {
    let temp = temp_file_beside(path)?;
    let file = temp
        .as_file()
        .try_clone()
        .with_path("failed to open temp file for", path)?;
    let value = write(file)?;
    persist(temp, path)?;
    Ok(value)
}
