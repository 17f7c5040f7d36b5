//! Discovery of the analytics engine's entry point
//!
//! The launcher has to work both from a packaged install, where the script is
//! bundled next to the binary, and from a development checkout, where it sits
//! in a source tree. Candidates are probed tier by tier relative to the
//! directory holding the launcher's own (symlink-resolved) executable.

use crate::config::ResolverConfig;
use crate::error::LaunchError;
use glob::{glob, Pattern};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a resolved entry point was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Override,
    Bundled,
    Development,
    Scan,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Override => "override",
            Tier::Bundled => "bundled",
            Tier::Development => "development",
            Tier::Scan => "scan",
        };
        f.write_str(name)
    }
}

/// Entry point chosen for this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub path: PathBuf,
    pub tier: Tier,
}

/// Anything that can produce the engine's entry point
pub trait ScriptLocator {
    fn locate(&self) -> Result<ResolvedScript, LaunchError>;
}

/// Probes the file system around the launcher's install location
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    config: ResolverConfig,
    executable: Option<PathBuf>,
}

impl FileDiscovery {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            executable: None,
        }
    }

    /// Probe relative to a given executable instead of the running one
    pub fn with_executable(config: ResolverConfig, executable: impl Into<PathBuf>) -> Self {
        Self {
            config,
            executable: Some(executable.into()),
        }
    }

    /// Directory the probes are relative to
    pub fn install_dir(&self) -> Result<PathBuf, LaunchError> {
        let exe = match &self.executable {
            Some(path) => path.clone(),
            None => std::env::current_exe().map_err(LaunchError::ExecutablePath)?,
        };

        let exe = if self.config.resolve_symlinks {
            match fs::canonicalize(&exe) {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!(path = %exe.display(), error = %e, "Could not resolve symlinks, using path as is");
                    exe
                }
            }
        } else {
            exe
        };

        Ok(exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Candidate files of a tier, in probe order
    fn candidates(&self, base: &Path, dirs: &[PathBuf]) -> Vec<PathBuf> {
        dirs.iter()
            .map(|dir| under(base, dir).join(&self.config.entry_point))
            .collect()
    }

    /// Last resort: first file with the script suffix in any scan directory
    fn scan(&self, base: &Path, searched: &mut Vec<PathBuf>) -> Option<PathBuf> {
        let file_pattern = format!("*.{}", self.config.script_suffix);
        for dir in &self.config.scan_dirs {
            let dir = under(base, dir);
            searched.push(dir.join(&file_pattern));

            // The directory part is literal; only the file name is a pattern
            let escaped = PathBuf::from(Pattern::escape(&dir.to_string_lossy()));
            let pattern = escaped.join(&file_pattern);

            let entries = match glob(&pattern.to_string_lossy()) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(pattern = %pattern.display(), error = %e, "Invalid scan pattern");
                    continue;
                }
            };

            // glob yields entries in alphabetical order
            if let Some(found) = entries.flatten().find(|p| p.is_file()) {
                return Some(found);
            }
        }
        None
    }
}

/// `base/dir`, without a `.` component when `dir` is the base itself
fn under(base: &Path, dir: &Path) -> PathBuf {
    if dir == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(dir)
    }
}

impl ScriptLocator for FileDiscovery {
    fn locate(&self) -> Result<ResolvedScript, LaunchError> {
        if let Some(path) = &self.config.entry_point_override {
            if path.is_file() {
                debug!(path = %path.display(), "Using entry point override");
                return Ok(ResolvedScript {
                    path: path.clone(),
                    tier: Tier::Override,
                });
            }
            return Err(LaunchError::EntryPointNotFound {
                searched: vec![path.clone()],
            });
        }

        let base = self.install_dir()?;
        debug!(install_dir = %base.display(), "Looking for entry point");

        let mut searched = Vec::new();
        let tiers = [
            (Tier::Bundled, &self.config.bundled_dirs),
            (Tier::Development, &self.config.development_dirs),
        ];

        for (tier, dirs) in tiers {
            for candidate in self.candidates(&base, dirs) {
                if candidate.is_file() {
                    debug!(path = %candidate.display(), %tier, "Found entry point");
                    return Ok(ResolvedScript {
                        path: candidate,
                        tier,
                    });
                }
                searched.push(candidate);
            }
        }

        if let Some(path) = self.scan(&base, &mut searched) {
            warn!(path = %path.display(), "Entry point not found by name, using first script found by scan");
            return Ok(ResolvedScript {
                path,
                tier: Tier::Scan,
            });
        }

        Err(LaunchError::EntryPointNotFound { searched })
    }
}
