//! ocsight launcher library
//!
//! The `ocsight` binary is a thin launcher for the OpenCode usage analytics
//! engine, a JavaScript program run by an external runtime. The launcher
//! parses the `analyze`, `stats` and `export` commands, finds the engine's
//! entry point next to its own install location, and runs it with the first
//! available runtime, forwarding standard streams and the exit code.
//!
//! ## Architecture Overview
//!
//! - [`cli`] - Command dispatcher: usage, version, first-token dispatch
//! - [`commands`] - Per-command flag definitions
//! - [`models`] - Commands, options and launch requests
//! - [`arguments`] - Argument vector construction
//! - [`file_discovery`] - Entry point discovery
//! - [`runner`] - Runtime fallback, child supervision and signal forwarding
//! - [`config`] - Configuration with file and environment variable support
//! - [`logging`] - Structured logging with JSON and pretty formats
//! - [`error`] - Error taxonomy and exit codes
//!
//! ## Example
//!
//! ```rust,no_run
//! use ocsight::cli::Dispatcher;
//! use ocsight::config::Config;
//! use ocsight::file_discovery::FileDiscovery;
//! use ocsight::runner::{RuntimeRunner, SystemSpawner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let dispatcher = Dispatcher::new(
//!     FileDiscovery::new(config.resolver.clone()),
//!     RuntimeRunner::new(SystemSpawner::default(), config.runtime.candidates.clone()),
//! );
//!
//! let code = dispatcher
//!     .run(["stats", "--days", "7"], &mut std::io::stdout(), &mut std::io::stderr())
//!     .await;
//! std::process::exit(code);
//! # }
//! ```

pub mod arguments;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod file_discovery;
pub mod logging;
pub mod models;
pub mod runner;

pub use cli::Dispatcher;
pub use error::{LaunchError, UsageError};
pub use models::*;
