//! Configuration loading for the report generator
//!
//! TOML file with built-in defaults for every field, resolved in
//! priority order:
//! 1. explicit path from the command line (must exist)
//! 2. `TERMO_CONFIG` environment variable (must exist)
//! 3. platform config dir (`~/.config/termo/config.toml`), then
//!    `/etc/termo/config.toml` on Linux (first one present wins)
//! 4. built-in defaults when no file is found

use crate::error::{Error, Result};
use crate::template::DEFAULT_TEMPLATE_PATTERN;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable naming an explicit config file path
pub const CONFIG_ENV_VAR: &str = "TERMO_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermoConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Template and output locations for report builds
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// Directory holding the docx templates
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Directory render bundles are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Template filename pattern with a `{count}` placeholder
    #[serde(default = "default_template_pattern")]
    pub template_pattern: String,
}

/// Map rendering collaborator
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    /// Base URL of the map rendering service
    ///
    /// When absent, map rendering is disabled and every report carries a
    /// skipped-map outcome.
    #[serde(default)]
    pub service_url: Option<String>,

    /// Per-request timeout for the map service
    #[serde(default = "default_map_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    5761
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_template_pattern() -> String {
    DEFAULT_TEMPLATE_PATTERN.to_string()
}

fn default_map_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TermoConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            report: ReportConfig::default(),
            map: MapConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            output_dir: default_output_dir(),
            template_pattern: default_template_pattern(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            timeout_secs: default_map_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl MapConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TermoConfig {
    /// Resolve and load the configuration
    ///
    /// An explicitly named file (argument or `TERMO_CONFIG`) must exist;
    /// discovered platform paths are optional and absence of all of them
    /// falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading configuration from {} (command line)", path.display());
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading configuration from {} ({})", path, CONFIG_ENV_VAR);
            return Self::from_file(Path::new(&path));
        }

        for candidate in default_config_paths() {
            if candidate.is_file() {
                info!("Loading configuration from {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        info!("No configuration file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

/// Platform config file candidates, in priority order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("termo").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/termo/config.toml"));
    }
    paths
}
