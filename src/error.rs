//! Error taxonomy for the launcher
//!
//! Configuration and environment failures, invocation failures and usage
//! failures are typed here. Failures of the analytics engine itself are not
//! errors from the launcher's point of view: its exit code is forwarded.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status used for every failure the launcher reports on its own.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Failures that stop the launcher before or while delegating to the engine
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to get executable path: {0}")]
    ExecutablePath(#[source] io::Error),

    #[error("Could not find JavaScript entry point (searched: {})", display_paths(.searched))]
    EntryPointNotFound { searched: Vec<PathBuf> },

    #[error("Failed to execute command: no runtime could be started (tried: {}): {source}", .tried.join(", "))]
    RuntimeUnavailable {
        tried: Vec<String>,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for {runtime}: {source}")]
    Wait {
        runtime: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}

/// Failures detected while reading the command line
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("No command given")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    InvalidFlags(#[from] clap::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
