//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub i18n: I18nConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_durable_file")]
    pub durable_file: String,

    #[serde(default = "default_ephemeral_in_memory")]
    pub ephemeral_in_memory: bool,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("mindtrack").to_string_lossy().to_string())
        .unwrap_or_else(|| "./mindtrack_data".to_string())
}

fn default_durable_file() -> String {
    "store.json".to_string()
}

fn default_ephemeral_in_memory() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            durable_file: default_durable_file(),
            ephemeral_in_memory: default_ephemeral_in_memory(),
        }
    }
}

impl StorageConfig {
    /// Absolute path of the durable store file
    pub fn durable_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.durable_file)
    }
}

/// Session behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Artificial delay before answering a login attempt (ms)
    #[serde(default)]
    pub login_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { login_delay_ms: 0 }
    }
}

/// Translation and quote file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_translations_file")]
    pub translations_file: String,

    #[serde(default = "default_quotes_file")]
    pub quotes_file: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_translations_file() -> String {
    "text/translations_en.json".to_string()
}

fn default_quotes_file() -> String {
    "text/quotes.json".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            translations_file: default_translations_file(),
            quotes_file: default_quotes_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("mindtrack").join("config.toml")),
            Some(PathBuf::from("/etc/mindtrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Storage overrides
        if let Ok(data_dir) = std::env::var("MINDTRACK_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Session overrides
        if let Ok(delay) = std::env::var("MINDTRACK_LOGIN_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                self.session.login_delay_ms = ms;
            }
        }

        // I18n overrides
        if let Ok(lang) = std::env::var("MINDTRACK_LANGUAGE") {
            self.i18n.language = lang;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("MINDTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MINDTRACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# MindTrack Configuration
#
# Environment variables override these settings:
# - MINDTRACK_DATA_DIR
# - MINDTRACK_LOGIN_DELAY_MS
# - MINDTRACK_LANGUAGE
# - MINDTRACK_LOG_LEVEL
# - MINDTRACK_LOG_FORMAT

[storage]
# Directory for the persisted store
data_dir = "~/.local/share/mindtrack"

# File name of the durable store inside data_dir
durable_file = "store.json"

# Keep the ephemeral session tier in memory (false writes it next to the
# durable file)
ephemeral_in_memory = true

[session]
# Artificial delay before answering a login attempt (ms)
login_delay_ms = 0

[i18n]
# Active language code
language = "en"

# Translation table (nested JSON)
translations_file = "text/translations_en.json"

# Quote collection (flat array or per-language map)
quotes_file = "text/quotes.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
