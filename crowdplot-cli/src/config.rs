//! Configuration handling for the crowdplot CLI
//!
//! Loaded from crowdplot.toml with command-line overrides applied on top.

use crowdplot_render::ChartConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "crowdplot.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Worker threads for per-day rendering (default: one per core)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `<YYYYMMDD>-<HHMMSS>` snapshot files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Location metadata (JSON object of records)
    #[serde(default = "default_metadata")]
    pub metadata: PathBuf,

    /// Output directory for `<YYYYMMDD>.svg` charts
    #[serde(default = "default_charts_dir")]
    pub charts_dir: PathBuf,

    /// Document whose chart listing is refreshed
    #[serde(default = "default_readme")]
    pub readme: PathBuf,

    /// Extension of snapshot files
    #[serde(default = "default_snapshot_extension")]
    pub snapshot_extension: String,
}

// Default value functions
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_metadata() -> PathBuf { PathBuf::from("atms.json") }
fn default_charts_dir() -> PathBuf { PathBuf::from("charts") }
fn default_readme() -> PathBuf { PathBuf::from("README.md") }
fn default_snapshot_extension() -> String { "csv".to_string() }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            metadata: default_metadata(),
            charts_dir: default_charts_dir(),
            readme: default_readme(),
            snapshot_extension: default_snapshot_extension(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)
                } else {
                    log::debug!("Using default configuration");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Failed to read configuration file {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        toml::to_string_pretty(&Self::default())
            .map_err(|e| CliError::config(format!("TOML serialization error: {}", e)))
    }
}
