//! 备份步骤守卫
//!
//! RAII 模式记录一次 backup 过程中新建的文件，
//! 未 commit 就被 drop 时按逆序删除，避免留下没有历史记录的孤立快照。

use std::fs;
use std::io;
use std::path::PathBuf;

/// 备份步骤守卫
#[derive(Debug, Default)]
pub struct BackupGuard {
    created: Vec<PathBuf>,
    committed: bool,
}

impl BackupGuard {
    /// 创建新的守卫
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录本次运行新建的文件
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.created.push(path.into());
    }

    /// 已记录的文件
    pub fn tracked(&self) -> &[PathBuf] {
        &self.created
    }

    /// 标记备份成功，不再需要回滚
    pub fn commit(&mut self) {
        self.committed = true;
    }

    /// 按逆序删除已记录的文件
    ///
    /// # Returns
    /// 成功删除的文件数量
    pub fn rollback(&mut self) -> io::Result<usize> {
        let mut removed = 0;
        while let Some(path) = self.created.pop() {
            match fs::remove_file(&path) {
                Ok(()) => {
                    log::debug!("Rolled back {}", path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    self.created.push(path);
                    return Err(e);
                }
            }
        }
        Ok(removed)
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.committed || self.created.is_empty() {
            return;
        }
        // 自动回滚
        if let Err(e) = self.rollback() {
            let pending: Vec<_> = self.created.iter().map(|p| p.display().to_string()).collect();
            log::warn!("Failed to clean up partial backup ({}): {}", pending.join(", "), e);
        }
    }
}
