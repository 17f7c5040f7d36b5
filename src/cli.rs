//! Command dispatcher
//!
//! Reads the first token of the command line, parses the chosen command's
//! flags, finds the engine's entry point and hands the built argument vector
//! to the runtime runner. All output is written to the given writers so the
//! whole flow can be driven from tests.

use clap::error::ErrorKind;
use colored::Colorize;
use std::ffi::OsString;
use std::io::Write;
use tracing::{debug, Instrument};

use crate::arguments::build_request_args;
use crate::commands::parse_options;
use crate::error::{LaunchError, UsageError, FAILURE_EXIT_CODE};
use crate::file_discovery::ScriptLocator;
use crate::models::{Command, LaunchRequest};
use crate::runner::{RuntimeRunner, Spawner};

pub const PROGRAM_NAME: &str = "ocsight";

/// Launcher version, injectable at build time through `OCSIGHT_VERSION`
pub const VERSION: &str = match option_env!("OCSIGHT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// What the command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Version,
    /// `ocsight <command> --help`
    CommandHelp(String),
    Launch(LaunchRequest),
}

/// Usage text listing every command
pub fn usage() -> String {
    let mut text = String::from(
        "OpenCode ecosystem observability platform - see everything happening in your OpenCode development\n\n\
         USAGE:\n    ocsight [COMMAND] [OPTIONS]\n\nCOMMANDS:\n",
    );
    for command in Command::ALL {
        text.push_str(&format!("    {:<12}{}\n", command.as_str(), command.summary()));
    }
    text.push_str(
        "\nOPTIONS:\n    -h, --help       Print help information\n    -v, --version    Print version information\n\n\
         Use 'ocsight [COMMAND] --help' for more information about a command.\n",
    );
    text
}

/// `<name> <version> (<os>/<arch>)`
pub fn version_line(name: &str, version: &str, os: &str, arch: &str) -> String {
    format!("{} {} ({}/{})", name, version, os, arch)
}

/// Interpret the arguments following the program name.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args = args.into_iter().map(Into::into);
    let first = args.next().ok_or(UsageError::MissingCommand)?;
    let token = first.to_string_lossy();

    match token.as_ref() {
        "--help" | "-h" => return Ok(Invocation::Help),
        "--version" | "-v" => return Ok(Invocation::Version),
        _ => {}
    }

    let command: Command = token
        .parse()
        .map_err(UsageError::UnknownCommand)?;

    match parse_options(command, args) {
        Ok(options) => Ok(Invocation::Launch(LaunchRequest::new(command, options))),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            Ok(Invocation::CommandHelp(e.render().to_string()))
        }
        Err(e) => Err(UsageError::InvalidFlags(e)),
    }
}

/// Answer everything that does not need the engine.
///
/// Help, version and usage errors are written here and their exit code comes
/// back as `Err`. A request that has to be launched comes back as `Ok`.
pub fn answer(
    parsed: Result<Invocation, UsageError>,
    version: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<LaunchRequest, i32> {
    match parsed {
        Ok(Invocation::Launch(request)) => Ok(request),
        Ok(Invocation::Help) => {
            let _ = write!(out, "{}", usage());
            Err(0)
        }
        Ok(Invocation::Version) => {
            let line = version_line(
                PROGRAM_NAME,
                version,
                std::env::consts::OS,
                std::env::consts::ARCH,
            );
            let _ = writeln!(out, "{}", line);
            Err(0)
        }
        Ok(Invocation::CommandHelp(text)) => {
            let _ = write!(out, "{}", text);
            Err(0)
        }
        Err(e) => Err(report_usage_error(e, out, err)),
    }
}

/// Top-level entry point tying resolution, argument building and execution together
pub struct Dispatcher<L, S> {
    locator: L,
    runner: RuntimeRunner<S>,
    version: &'static str,
}

impl<L: ScriptLocator, S: Spawner> Dispatcher<L, S> {
    pub fn new(locator: L, runner: RuntimeRunner<S>) -> Self {
        Self {
            locator,
            runner,
            version: VERSION,
        }
    }

    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    pub fn runner(&self) -> &RuntimeRunner<S> {
        &self.runner
    }

    /// Run one invocation and return the process exit code.
    pub async fn run<I, T>(&self, args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match answer(parse_invocation(args), self.version, out, err) {
            Ok(request) => self.execute(&request, err).await,
            Err(code) => code,
        }
    }

    /// Launch the engine for an already parsed request.
    pub async fn execute(&self, request: &LaunchRequest, err: &mut dyn Write) -> i32 {
        let span = crate::invocation_span!(request.command);
        match self.launch(request).instrument(span).await {
            Ok(code) => code,
            Err(e) => {
                debug!(error = %e, "Launch failed");
                let _ = writeln!(err, "{}", e.to_string().red());
                e.exit_code()
            }
        }
    }

    async fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        let script = self.locator.locate()?;
        debug!(path = %script.path.display(), tier = %script.tier, "Resolved entry point");

        let args = build_request_args(&script.path, request);
        debug!(args = ?args, "Built engine arguments");

        self.runner.run(&args).await
    }
}

fn report_usage_error(e: UsageError, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    match e {
        UsageError::MissingCommand => {
            let _ = write!(out, "{}", usage());
        }
        UsageError::UnknownCommand(token) => {
            let _ = write!(out, "Unknown command: {}\n\n{}", token, usage());
        }
        UsageError::InvalidFlags(clap_err) => {
            let _ = write!(err, "{}", clap_err.render());
        }
    }
    FAILURE_EXIT_CODE
}
