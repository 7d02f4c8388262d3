use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::bus::BusKind;
use crate::shell::ShellOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub shell: ShellConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BusConfig {
    /// Bus to connect to on startup: none, session, system, or an address
    #[serde(default = "default_bus")]
    pub default: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            default: default_bus(),
        }
    }
}

fn default_bus() -> String {
    "none".to_string()
}

impl BusConfig {
    /// Startup bus, `None` when no connection should be made.
    pub fn startup_kind(&self) -> Option<BusKind> {
        BusKind::from_arg(&self.default)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShellConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Pager for long output; empty disables paging
    #[serde(default = "default_pager")]
    pub pager: String,

    /// Keep command history between sessions
    #[serde(default = "default_true")]
    pub history: bool,

    /// Program used by `call`
    #[serde(default = "default_invoker")]
    pub invoker: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            pager: default_pager(),
            history: true,
            invoker: default_invoker(),
        }
    }
}

fn default_prompt() -> String {
    "busnav> ".to_string()
}

fn default_pager() -> String {
    "less -R".to_string()
}

fn default_invoker() -> String {
    "gdbus".to_string()
}

fn default_true() -> bool {
    true
}

impl ShellConfig {
    pub fn options(&self) -> ShellOptions {
        ShellOptions {
            pager: self.pager.clone(),
            invoker: self.invoker.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    fn project_dirs() -> Result<ProjectDirs, ConfigError> {
        ProjectDirs::from("org", "busnav", "busnav").ok_or(ConfigError::NoConfigDir)
    }

    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.config_dir().to_path_buf())
    }

    /// Get the data directory path (history, crash reports)
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the history file path
    pub fn history_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::data_dir()?.join("history"))
    }

    /// Load config from the default location, or create it if it does not exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, writing defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.prompt.is_empty() {
            return Err(ConfigError::ValidationError(
                "shell prompt must not be empty".into(),
            ));
        }

        if self.shell.invoker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shell invoker must not be empty".into(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }

        if self.bus.default != "none" && self.bus.startup_kind().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown default bus {:?}",
                self.bus.default
            )));
        }

        Ok(())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create config directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Config saved to: {}", path.display());
        Ok(())
    }
}
