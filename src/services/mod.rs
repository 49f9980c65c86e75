//! Services module for synu
//!
//! Filesystem helpers shared by the commands.

pub mod atomic_fs;
pub mod backup_guard;

pub use backup_guard::BackupGuard;
