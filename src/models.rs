//! Core Data Models
//!
//! Types that describe one launcher invocation, from the parsed command line
//! to the request handed to the runtime.
//!
//! ## Data Flow
//!
//! 1. **Command**: [`Command`] - the subcommand chosen on the command line
//! 2. **Options**: [`OptionSet`] - named flags in declared order, each with an
//!    explicit presence marker
//! 3. **Request**: [`LaunchRequest`] - command plus options, ready to be turned
//!    into an argument vector
//!
//! An option that was not given on the command line is `None` and is never
//! forwarded. A given option is always forwarded, so `--days 0` reaches the
//! engine as `--days 0`.

use clap::ValueEnum;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

/// Subcommands understood by the analytics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Analyze,
    Stats,
    Export,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Analyze, Command::Stats, Command::Export];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Analyze => "analyze",
            Command::Stats => "stats",
            Command::Export => "export",
        }
    }

    /// One-line description shown in the usage text
    pub fn summary(&self) -> &'static str {
        match self {
            Command::Analyze => "Analyze OpenCode usage data",
            Command::Stats => "Show detailed statistics about OpenCode usage",
            Command::Export => "Export OpenCode usage data to CSV, JSON or Markdown",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Value of a single forwarded option
///
/// Text is kept as the platform string it arrived as, so values that are not
/// valid UTF-8 reach the engine byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(OsString),
    Integer(i64),
}

impl OptionValue {
    /// Render as exactly one argument token. Integers are base 10, unpadded.
    pub fn render(&self) -> OsString {
        match self {
            OptionValue::Text(s) => s.clone(),
            OptionValue::Integer(n) => OsString::from(n.to_string()),
        }
    }
}

impl From<OsString> for OptionValue {
    fn from(value: OsString) -> Self {
        OptionValue::Text(value)
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value.into())
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.into())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

/// Named options in a stable, declared order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<(&'static str, Option<OptionValue>)>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option. Declaration order is forwarding order.
    pub fn push<V: Into<OptionValue>>(&mut self, name: &'static str, value: Option<V>) {
        self.entries.push((name, value.map(Into::into)));
    }

    pub fn with<V: Into<OptionValue>>(mut self, name: &'static str, value: Option<V>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Options that were actually given, in declared order
    pub fn present(&self) -> impl Iterator<Item = (&'static str, &OptionValue)> + '_ {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (*name, v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Export formats accepted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to delegate one invocation to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub command: Command,
    pub options: OptionSet,
}

impl LaunchRequest {
    pub fn new(command: Command, options: OptionSet) -> Self {
        Self { command, options }
    }
}
