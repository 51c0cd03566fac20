//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::api::DEFAULT_API_BASE;
use crate::session::default_session_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means the HTTP client's own default applies
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub path: String,
}

fn default_session_file() -> String {
    default_session_path().to_string_lossy().to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_file(),
        }
    }
}

/// Dashboard behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_create_refresh_delay")]
    pub create_account_refresh_delay_ms: u64,
}

fn default_create_refresh_delay() -> u64 {
    500
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            create_account_refresh_delay_ms: default_create_refresh_delay(),
        }
    }
}

impl UiConfig {
    pub fn create_account_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.create_account_refresh_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
            dirs::config_dir().map(|p| p.join("bankdash").join("config.toml")),
            Some(PathBuf::from("/etc/bankdash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BANKDASH_API_URL") {
            self.api.base_url = url;
        }
        if let Some(path) = lookup("BANKDASH_SESSION_FILE") {
            self.session.path = path;
        }
        if let Some(level) = lookup("BANKDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BANKDASH_LOG_FORMAT") {
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
    r#"# Bankdash Configuration
#
# Environment variables override these settings:
# - BANKDASH_API_URL
# - BANKDASH_SESSION_FILE
# - BANKDASH_LOG_LEVEL
# - BANKDASH_LOG_FORMAT

[api]
# Banking backend base URL
base_url = "http://localhost:8080/api"

# Request timeout in seconds (unset: HTTP client default)
# request_timeout_secs = 30

[session]
# Where the logged-in user is remembered between runs
# path = "~/.local/share/bankdash/session.json"

[ui]
# Wait before reloading accounts after creating one (ms)
create_account_refresh_delay_ms = 500

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
