//! Local storage module for synu
//!
//! JSON persistence for the project config (project side) and the
//! history log (external side).

pub mod config_store;
pub mod history_log;

pub use config_store::ResolvedPath;
