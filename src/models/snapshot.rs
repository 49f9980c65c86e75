//! 快照命名规则
//!
//! 快照文件名为 `{project_name}_{YYYYMMDD_HHMMSS}.zip`。
//! 同一秒内重复备份时追加三位序号 `_001`、`_002`……
//! 带序号的名字按字典序排在无序号名字之后，因此“最新”仍然是字典序最大的文件名。

use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{Result, SyncError};
use crate::paths::SNAPSHOT_EXTENSION;

/// 快照名中时间戳的格式 (同时写入 history.json)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 快照文件名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotName {
    project: String,
    timestamp: String,
    sequence: u32,
}

impl SnapshotName {
    /// 根据项目名和本地时间构造快照名
    pub fn new(project: &str, at: NaiveDateTime) -> Self {
        Self {
            project: project.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            sequence: 0,
        }
    }

    /// 返回带序号的同名快照 (0 表示无序号)
    pub fn with_sequence(&self, sequence: u32) -> Self {
        Self {
            sequence,
            ..self.clone()
        }
    }

    /// 时间戳部分
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// 完整文件名
    pub fn file_name(&self) -> String {
        if self.sequence == 0 {
            format!("{}_{}.{}", self.project, self.timestamp, SNAPSHOT_EXTENSION)
        } else {
            format!(
                "{}_{}_{:03}.{}",
                self.project, self.timestamp, self.sequence, SNAPSHOT_EXTENSION
            )
        }
    }
}

impl fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// 判断目录项名称是否为快照归档
pub fn is_snapshot_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == SNAPSHOT_EXTENSION)
}

/// 校验用户给出的快照名只是一个文件名，不含路径分隔符或 `..`
pub fn validate_snapshot_name(name: &str) -> Result<()> {
    let is_bare = !name.is_empty()
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == name);
    if is_bare {
        Ok(())
    } else {
        Err(SyncError::InvalidSnapshotName(name.to_string()))
    }
}
