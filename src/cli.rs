//! Command line interface
//!
//! Parses arguments with clap and renders command reports as the lines
//! printed to stdout.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::commands::{self, InitOutcome};
use crate::error::Result;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "synu",
    version,
    about = "Git-style project snapshots on removable storage",
    after_help = "Run one synu command at a time per project and external path: nothing is locked."
)]
pub struct CliArgs {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the project (creates .sync/)
    Init {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        current: PathBuf,
    },
    /// Create a compressed snapshot and copy it to the external path
    Backup {
        /// External path (only required the first time)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Backup message
        #[arg(short, long)]
        message: String,
        /// Project directory
        #[arg(short, long, default_value = ".")]
        current: PathBuf,
    },
    /// Restore the latest snapshot from the external path
    Restore {
        /// External path (only required if none is remembered)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Project directory
        #[arg(short, long, default_value = ".")]
        current: PathBuf,
    },
    /// Restore a specific snapshot from the external path
    Downgrade {
        /// External path (only required if none is remembered)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Snapshot file name to restore
        #[arg(short, long)]
        snap: String,
        /// Project directory
        #[arg(short, long, default_value = ".")]
        current: PathBuf,
    },
    /// Show the backup history of the external path, newest first
    Log {
        /// External path (only required if none is remembered)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Project directory
        #[arg(short, long, default_value = ".")]
        current: PathBuf,
    },
}

/// Run one command and return the lines to print
pub fn run(command: Command) -> Result<Vec<String>> {
    let lines = match command {
        Command::Init { current } => {
            let project = commands::project_root(&current)?;
            match commands::init(&project)? {
                InitOutcome::Initialized(config) => vec![format!(
                    "Project '{}' initialized with ID {}.",
                    config.project_name, config.identifier
                )],
                InitOutcome::AlreadyInitialized => {
                    vec!["This project is already initialized.".to_string()]
                }
            }
        }
        Command::Backup {
            path,
            message,
            current,
        } => {
            let project = commands::project_root(&current)?;
            let now = chrono::Local::now().naive_local();
            let report = commands::backup(&project, path.as_deref(), &message, now)?;
            let mut lines = remembered_line(report.remembered_path, &report.external_path);
            lines.push(format!("Backup created: {}", report.snapshot));
            lines
        }
        Command::Restore { path, current } => {
            let project = commands::project_root(&current)?;
            let report = commands::restore(&project, path.as_deref())?;
            let mut lines = remembered_line(report.remembered_path, &report.external_path);
            lines.push(format!("Restored from snapshot: {}", report.snapshot));
            lines
        }
        Command::Downgrade {
            path,
            snap,
            current,
        } => {
            let project = commands::project_root(&current)?;
            let report = commands::downgrade(&project, path.as_deref(), &snap)?;
            let mut lines = remembered_line(report.remembered_path, &report.external_path);
            lines.push(format!("Restored from snapshot: {}", report.snapshot));
            lines
        }
        Command::Log { path, current } => {
            let project = commands::project_root(&current)?;
            let report = commands::history(&project, path.as_deref())?;
            if report.entries.is_empty() {
                vec![format!(
                    "No backups recorded on {}.",
                    report.external_path.display()
                )]
            } else {
                report
                    .entries
                    .iter()
                    .map(|e| format!("{}  {}", e.snapshot, e.message))
                    .collect()
            }
        }
    };
    Ok(lines)
}

fn remembered_line(remembered: bool, external: &Path) -> Vec<String> {
    if remembered {
        vec![format!("External path set to {}.", external.display())]
    } else {
        Vec::new()
    }
}
