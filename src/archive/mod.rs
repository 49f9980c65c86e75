//! Snapshot archiver
//!
//! Packs a project tree into a deflate ZIP and unpacks it again.
//! Directory entries end in `/`, empty files are zero-length entries,
//! and anything under a `.sync` path segment is left out.

mod reader;
mod writer;

pub use reader::{extract_snapshot, ExtractStats};
pub use writer::{create_snapshot, is_excluded, ArchiveStats};
