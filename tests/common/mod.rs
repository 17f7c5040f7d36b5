#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Binary under test with a hermetic configuration
pub fn launcher(config_dir: &TempDir) -> Command {
    Command::from_std(launcher_process(config_dir))
}

/// Same as [`launcher`], for tests that need the running child's pid
pub fn launcher_process(config_dir: &TempDir) -> std::process::Command {
    let config = config_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").expect("write empty config");
    }

    let mut cmd = std::process::Command::cargo_bin("ocsight").expect("ocsight binary");
    cmd.env("OCSIGHT_CONFIG", &config)
        .env_remove("OCSIGHT_ENTRY_POINT")
        .env_remove("OCSIGHT_RUNTIME")
        .env_remove("OCSIGHT_FORWARD_SIGNALS")
        .env_remove("RUST_LOG")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_FORMAT")
        .env("NO_COLOR", "1");
    cmd
}

pub fn create_entry_point(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("index.js");
    fs::write(&path, "// analytics engine placeholder\n")?;
    Ok(path)
}

/// An entry point that `sh` can run in place of the analytics engine: prints
/// its own path and each argument on a line, optionally echoes stdin, and
/// exits with `$FAKE_EXIT_CODE` (default 0)
pub fn create_shell_engine(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("index.js");
    fs::write(
        &path,
        "printf 'arg:%s\\n' \"$0\"\n\
         for arg in \"$@\"; do printf 'arg:%s\\n' \"$arg\"; done\n\
         if [ -n \"$FAKE_READ_STDIN\" ]; then cat; fi\n\
         echo \"engine warning\" >&2\n\
         exit \"${FAKE_EXIT_CODE:-0}\"\n",
    )?;
    Ok(path)
}

/// An entry point for `sh` that touches `$ENGINE_READY` once its TERM trap is
/// in place, then waits; on SIGTERM it exits 42
pub fn create_trapping_engine(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("trapping.js");
    fs::write(
        &path,
        "trap 'exit 42' TERM\n\
         touch \"$ENGINE_READY\"\n\
         sleep 10 &\n\
         wait\n\
         exit 0\n",
    )?;
    Ok(path)
}
