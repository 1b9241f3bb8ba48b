//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::entities::MechanicId;

/// Environment variable that relocates the config directory (config + session)
pub const CONFIG_DIR_ENV: &str = "SHOP_CONFIG_DIR";

/// Note author used when none is configured
pub const DEFAULT_AUTHOR: &str = "Owner";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API URL configured. Set SHOP_API_URL, pass --api-url, or run 'shop config set api_url <url>'")]
    MissingApiUrl,

    #[error("Invalid API URL '{url}': {message}")]
    InvalidApiUrl { url: String, message: String },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Unknown config key '{0}'. Run 'shop config keys' to list valid keys")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// shopdesk configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the shop API (e.g. `https://shop.example.com/api`)
    pub api_url: Option<String>,

    /// Mechanic that lifecycle actions are performed as
    pub mechanic_id: Option<MechanicId>,

    /// Author recorded on new notes
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Request timeout in seconds (no timeout when unset)
    pub timeout_secs: Option<u64>,
}

/// Valid configuration keys
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("api_url", "Base URL of the shop API"),
    ("mechanic_id", "Mechanic id used for assign/start/pause/resume/complete"),
    ("author", "Author name recorded on new notes"),
    ("default_format", "Default output format (tsv, json, yaml, csv, md)"),
    ("timeout_secs", "HTTP request timeout in seconds"),
];

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/shopdesk/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match std::fs::read_to_string(&global_path)
                    .map_err(|e| e.to_string())
                    .and_then(|c| serde_yml::from_str::<Config>(&c).map_err(|e| e.to_string()))
                {
                    Ok(global) => config.merge(global),
                    Err(e) => tracing::warn!(
                        path = %global_path.display(),
                        error = %e,
                        "ignoring unreadable config file"
                    ),
                }
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn from_env() -> Self {
        Config {
            api_url: std::env::var("SHOP_API_URL").ok().filter(|v| !v.is_empty()),
            mechanic_id: std::env::var("SHOP_MECHANIC_ID")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            author: std::env::var("SHOP_AUTHOR").ok().filter(|v| !v.is_empty()),
            default_format: None,
            timeout_secs: std::env::var("SHOP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Directory holding `config.yaml` and `session.yaml`
    pub fn config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir));
        }
        directories::ProjectDirs::from("", "", "shopdesk").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.mechanic_id.is_some() {
            self.mechanic_id = other.mechanic_id;
        }
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// The validated API base URL, without a trailing slash
    pub fn api_url(&self) -> Result<String, ConfigError> {
        let raw = self.api_url.as_deref().ok_or(ConfigError::MissingApiUrl)?;
        validate_api_url(raw)
    }

    /// Note author, falling back to "Owner"
    pub fn author(&self) -> String {
        self.author
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Look up a key's effective value for display
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "mechanic_id" => self.mechanic_id.map(|m| m.to_string()),
            "author" => self.author.clone(),
            "default_format" => self.default_format.clone(),
            "timeout_secs" => self.timeout_secs.map(|t| t.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        })
    }
}

/// Check that `raw` is an absolute http(s) URL and strip any trailing slash
pub fn validate_api_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            message: "scheme must be http or https".to_string(),
        });
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Convert a `config set` value into the YAML scalar the key expects
pub fn typed_value(key: &str, value: &str) -> Result<serde_yml::Value, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match key {
        "mechanic_id" | "timeout_secs" => value
            .trim()
            .parse::<u64>()
            .map(|n| serde_yml::Value::Number(n.into()))
            .map_err(|e| invalid(e.to_string())),
        "api_url" => validate_api_url(value).map(serde_yml::Value::String),
        "author" | "default_format" => Ok(serde_yml::Value::String(value.to_string())),
        _ => Err(ConfigError::UnknownKey(key.to_string())),
    }
}
