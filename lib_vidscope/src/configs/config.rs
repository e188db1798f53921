use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::JsonFileStore;

/// Default base URL of the analysis service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";
/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "vidscope.conf";

#[derive(Args, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[arg(long, global = true, env = "VIDSCOPE_BASE_URL", help = "Base URL of the analysis service.")]
    pub base_url: Option<String>,

    #[arg(long, global = true, env = "VIDSCOPE_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[arg(long, global = true, env = "VIDSCOPE_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "VIDSCOPE_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,

    #[arg(long, global = true, env = "VIDSCOPE_STORE_PATH", help = "Path to the JSON key-value store.")]
    pub store_path: Option<PathBuf>,

    #[arg(long, global = true, env = "VIDSCOPE_MAX_RETRIES", help = "Retries for transient HTTP failures (0 disables retrying).")]
    pub max_retries: Option<u32>,

    #[arg(long, short = 'o', global = true, env = "VIDSCOPE_OUTPUT", help = "Write the HTML page to this file instead of stdout.")]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Merges two configs, where `other` overrides `self` for `Some` values.
    pub fn merge(self, other: Config) -> Config {
        Config {
            base_url: other.base_url.or(self.base_url),
            config_path: other.config_path.or(self.config_path),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            store_path: other.store_path.or(self.store_path),
            max_retries: other.max_retries.or(self.max_retries),
            output: other.output.or(self.output),
        }
    }

    /// Built-in defaults, the lowest layer.
    pub fn defaults() -> Config {
        Config {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            log_dir: Some(PathBuf::from("./logs")),
            log_level: Some("info".to_string()),
            store_path: JsonFileStore::default_path(),
            max_retries: Some(0),
            ..Default::default()
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| PathBuf::from("./logs"))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(0)
    }

    /// Reads one JSON config file. Problems are logged and yield `None`.
    pub fn from_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            log::info!("Config file not found at {}. Using defaults and environment/CLI variables.", path.display());
            return None;
        }
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Config>(&text) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {}. Falling back to other sources.", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {}: {}. Falling back to other sources.", path.display(), e);
                None
            }
        }
    }
}

/// Resolves the effective configuration.
///
/// Layers, lowest first: built-in defaults, the JSON config file
/// (`--config-path` or `vidscope.conf`), then environment variables and CLI
/// flags, which clap has already folded into `cli`.
///
/// # Arguments
/// * `cli` - The parsed command line (including `VIDSCOPE_*` variables).
pub fn load_config(cli: Config) -> Config {
    let config_file_path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut current = Config::defaults();
    if let Some(file_config) = Config::from_file(&config_file_path) {
        current = current.merge(file_config);
    }
    current.merge(cli)
}
