//! Launcher configuration
//!
//! Provides layered configuration management with:
//! - Runtime defaults
//! - Config file loading (optional)
//! - Environment variable overrides
//! - Validation
//!
//! The loaded [`Config`] is passed explicitly to the components that need it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Paths configuration
    pub paths: PathsConfig,

    /// Entry point discovery
    pub resolver: ResolverConfig,

    /// Runtime selection and supervision
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub log_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// File name of the engine's entry point
    pub entry_point: String,
    /// Explicit entry point, bypasses discovery
    pub entry_point_override: Option<PathBuf>,
    /// Suffix accepted by the last-resort directory scan
    pub script_suffix: String,
    /// Follow symlinks on the launcher's own path before probing
    pub resolve_symlinks: bool,
    /// Directories probed for packaged installs, relative to the launcher
    pub bundled_dirs: Vec<PathBuf>,
    /// Directories probed for development checkouts
    pub development_dirs: Vec<PathBuf>,
    /// Directories scanned for any file with `script_suffix`
    pub scan_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtimes tried in order until one starts
    pub candidates: Vec<String>,
    /// Forward termination signals to the running child
    pub forward_signals: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_directory: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ocsight")
                .join("logs"),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            entry_point: "index.js".to_string(),
            entry_point_override: None,
            script_suffix: "js".to_string(),
            resolve_symlinks: true,
            bundled_dirs: vec![
                PathBuf::from("lib"),
                Path::new("..").join("libexec"),
                PathBuf::from("."),
            ],
            development_dirs: vec![
                PathBuf::from("src"),
                Path::new("..").join("src"),
                Path::new("..").join("lib"),
            ],
            scan_dirs: vec![
                PathBuf::from("lib"),
                Path::new("..").join("lib"),
                PathBuf::from("."),
            ],
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["bun".to_string(), "node".to_string()],
            forward_signals: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            resolver: ResolverConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment and defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from_file(&path)?,
            Some(path) if env::var_os("OCSIGHT_CONFIG").is_some() => {
                anyhow::bail!("Config file does not exist: {}", path.display())
            }
            _ => Config::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// `$OCSIGHT_CONFIG`, else `<config_dir>/ocsight/config.toml`
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(path) = env::var_os("OCSIGHT_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("ocsight").join("config.toml"))
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(config_file = %path.display(), "Loaded configuration file");

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }
        if let Some(val) = env::var_os("OCSIGHT_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        // Resolver overrides
        if let Some(val) = env::var_os("OCSIGHT_ENTRY_POINT") {
            if !val.is_empty() {
                self.resolver.entry_point_override = Some(PathBuf::from(val));
            }
        }
        if let Ok(val) = env::var("OCSIGHT_RESOLVE_SYMLINKS") {
            self.resolver.resolve_symlinks = val
                .parse()
                .context("Invalid OCSIGHT_RESOLVE_SYMLINKS")?;
        }

        // Runtime overrides
        if let Ok(val) = env::var("OCSIGHT_RUNTIME") {
            self.runtime.candidates = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(val) = env::var("OCSIGHT_FORWARD_SIGNALS") {
            self.runtime.forward_signals = val
                .parse()
                .context("Invalid OCSIGHT_FORWARD_SIGNALS")?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.runtime.candidates.is_empty() {
            return Err(anyhow::anyhow!("At least one runtime candidate is required"));
        }

        if self.runtime.candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(anyhow::anyhow!("Runtime candidate names cannot be blank"));
        }

        if self.resolver.entry_point.trim().is_empty() {
            return Err(anyhow::anyhow!("Entry point file name cannot be empty"));
        }

        if self.resolver.script_suffix.trim().is_empty() {
            return Err(anyhow::anyhow!("Script suffix cannot be empty"));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "Log format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            ));
        }

        if !matches!(self.logging.output.as_str(), "console" | "file" | "both") {
            return Err(anyhow::anyhow!(
                "Log output must be 'console', 'file' or 'both', got '{}'",
                self.logging.output
            ));
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}
