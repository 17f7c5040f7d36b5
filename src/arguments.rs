//! Argument vector construction for the analytics engine
//!
//! The engine is invoked as `<entry-point> <command> [--<flag> <value>]...`.
//! Every value is a discrete argument: nothing is quoted, escaped or joined,
//! so a value containing whitespace still arrives as one token.

use crate::models::{Command, LaunchRequest, OptionSet};
use std::ffi::OsString;
use std::path::Path;

/// Build the arguments passed to the runtime.
pub fn build_args(script: &Path, command: Command, options: &OptionSet) -> Vec<OsString> {
    let mut args = Vec::with_capacity(2 + options.len() * 2);
    args.push(script.as_os_str().to_os_string());
    args.push(OsString::from(command.as_str()));

    for (name, value) in options.present() {
        args.push(OsString::from(format!("--{}", name)));
        args.push(value.render());
    }

    args
}

/// Convenience wrapper over [`build_args`] for a whole request
pub fn build_request_args(script: &Path, request: &LaunchRequest) -> Vec<OsString> {
    build_args(script, request.command, &request.options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionValue;
    use std::path::PathBuf;

    fn script() -> PathBuf {
        PathBuf::from("/usr/local/lib/ocsight/lib/index.js")
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_unset_options_yield_script_and_command_only() {
        let options = OptionSet::new()
            .with::<i64>("days", None)
            .with::<String>("start", None)
            .with::<String>("end", None)
            .with::<String>("provider", None);

        for command in Command::ALL {
            let args = build_args(&script(), command, &options);
            assert_eq!(
                strings(&args),
                vec![script().display().to_string(), command.as_str().to_string()]
            );
        }
    }

    #[test]
    fn test_value_with_whitespace_stays_one_token() {
        let options = OptionSet::new().with("project", Some("my project  name"));
        let args = strings(&build_args(&script(), Command::Analyze, &options));

        let flag = args.iter().position(|a| a == "--project").unwrap();
        assert_eq!(args[flag + 1], "my project  name");
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_integer_round_trips_through_text() {
        for days in [1i64, 7, 30, 365, 10_000, -3, i64::MAX] {
            let options = OptionSet::new().with("days", Some(days));
            let args = strings(&build_args(&script(), Command::Stats, &options));
            assert_eq!(args[2], "--days");
            assert_eq!(args[3].parse::<i64>().unwrap(), days);
        }
    }

    #[test]
    fn test_explicit_zero_and_empty_are_forwarded() {
        let options = OptionSet::new()
            .with("days", Some(0i64))
            .with("provider", Some(""));
        let args = strings(&build_args(&script(), Command::Analyze, &options));
        assert_eq!(&args[2..], ["--days", "0", "--provider", ""]);
    }

    #[test]
    fn test_flags_follow_declared_order() {
        let options = OptionSet::new()
            .with("end", Some("2024-02-01"))
            .with("days", Some(3i64))
            .with("start", Some("2024-01-01"));
        let args = strings(&build_args(&script(), Command::Export, &options));
        assert_eq!(
            &args[2..],
            ["--end", "2024-02-01", "--days", "3", "--start", "2024-01-01"]
        );
    }

    #[test]
    fn test_request_wrapper_matches_builder() {
        let options = OptionSet::new().with("format", Some(OptionValue::from("json")));
        let request = LaunchRequest::new(Command::Export, options.clone());
        assert_eq!(
            build_request_args(&script(), &request),
            build_args(&script(), Command::Export, &options)
        );
    }
}
