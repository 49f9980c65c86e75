// Synu Library
// Git-style project snapshots mirrored to removable storage

pub mod archive;
pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod paths;
pub mod services;
pub mod storage;

pub use error::{Result, SyncError};
