//! Per-command flag definitions
//!
//! Each command parses its own flags with its own defaults. Parsed flags are
//! turned into an [`OptionSet`] in a fixed declaration order so the forwarded
//! argument vector is reproducible. Text values stay `OsString` end to end.

use clap::{value_parser, Args, Parser};
use std::ffi::OsString;

use crate::models::{Command, ExportFormat, OptionSet};

/// Filters shared by every command
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FilterArgs {
    /// Filter to last N days
    #[arg(short = 'd', long, value_name = "N", allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Start date (YYYY-MM-DD)
    #[arg(short = 's', long, value_name = "DATE", value_parser = value_parser!(OsString))]
    pub start: Option<OsString>,

    /// End date (YYYY-MM-DD)
    #[arg(short = 'e', long, value_name = "DATE", value_parser = value_parser!(OsString))]
    pub end: Option<OsString>,

    /// Filter by provider (anthropic, openai, etc.)
    #[arg(long, value_name = "PROVIDER", value_parser = value_parser!(OsString))]
    pub provider: Option<OsString>,

    /// Filter by project name
    #[arg(long, value_name = "PROJECT", value_parser = value_parser!(OsString))]
    pub project: Option<OsString>,

    /// Exclude project name
    #[arg(
        long = "exclude-project",
        value_name = "PROJECT",
        value_parser = value_parser!(OsString)
    )]
    pub exclude_project: Option<OsString>,
}

impl FilterArgs {
    pub fn append_to(&self, options: &mut OptionSet) {
        options.push("days", self.days);
        options.push("start", self.start.clone());
        options.push("end", self.end.clone());
        options.push("provider", self.provider.clone());
        options.push("project", self.project.clone());
        options.push("exclude-project", self.exclude_project.clone());
    }
}

/// Analyze OpenCode usage data
#[derive(Debug, Parser)]
#[command(name = "analyze", bin_name = "ocsight analyze", disable_version_flag = true)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Show detailed statistics about OpenCode usage
#[derive(Debug, Parser)]
#[command(name = "stats", bin_name = "ocsight stats", disable_version_flag = true)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Export OpenCode usage data to CSV, JSON or Markdown
#[derive(Debug, Parser)]
#[command(name = "export", bin_name = "ocsight export", disable_version_flag = true)]
pub struct ExportArgs {
    /// Custom path to OpenCode data directory
    #[arg(short = 'p', long, value_name = "PATH", value_parser = value_parser!(OsString))]
    pub path: Option<OsString>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Export format
    #[arg(short = 'f', long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file path
    #[arg(short = 'o', long, value_name = "FILE", value_parser = value_parser!(OsString))]
    pub output: Option<OsString>,
}

impl ExportArgs {
    pub fn to_options(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.push("path", self.path.clone());
        self.filters.append_to(&mut options);
        options.push("format", Some(self.format.as_str()));
        options.push("output", self.output.clone());
        options
    }
}

fn filter_options(filters: &FilterArgs) -> OptionSet {
    let mut options = OptionSet::new();
    filters.append_to(&mut options);
    options
}

/// Parse the flags following `command` into its option set.
pub fn parse_options<I, T>(command: Command, args: I) -> Result<OptionSet, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv = std::iter::once(OsString::from(command.as_str()))
        .chain(args.into_iter().map(Into::into));

    match command {
        Command::Analyze => AnalyzeArgs::try_parse_from(argv).map(|a| filter_options(&a.filters)),
        Command::Stats => StatsArgs::try_parse_from(argv).map(|a| filter_options(&a.filters)),
        Command::Export => ExportArgs::try_parse_from(argv).map(|a| a.to_options()),
    }
}
