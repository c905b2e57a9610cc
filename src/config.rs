//! Configuration management for cep-race using the prefer crate.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::lookup::{Endpoint, CEP_PLACEHOLDER};

/// Default race timeout in milliseconds (1 second).
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Environment variable overriding the race timeout.
pub const TIMEOUT_ENV: &str = "CEP_RACE_TIMEOUT_MS";
/// Environment variable overriding the user agent.
pub const USER_AGENT_ENV: &str = "CEP_RACE_USER_AGENT";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("At least one endpoint must be configured")]
    NoEndpoints,

    #[error("Endpoint {label} has no {placeholder} placeholder in {template}")]
    MissingPlaceholder {
        label: String,
        template: String,
        placeholder: &'static str,
    },

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Race timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Services raced against each other.
    #[serde(default = "Endpoint::defaults")]
    pub endpoints: Vec<Endpoint>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: None,
            endpoints: Endpoint::defaults(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no cep-race config file exists.
    pub async fn load() -> Result<Self, ConfigError> {
        let config = match prefer::load("cep-race").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    Self::load_from_path(path).await?
                } else {
                    Self::default()
                }
            }
            Err(e) => {
                debug!("No config file discovered: {}", e);
                Self::default()
            }
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML, and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse configuration contents in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        let config = match ext {
            "toml" => toml::from_str(contents)?,
            "yaml" | "yml" => serde_yaml::from_str(contents)?,
            _ => serde_json::from_str(contents)?,
        };
        Ok(config)
    }

    /// Apply `CEP_RACE_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|s| !s.is_empty()) {
            match raw.trim().parse() {
                Ok(ms) => self.timeout_ms = ms,
                Err(_) => warn!("Ignoring invalid {}: {}", TIMEOUT_ENV, raw),
            }
        }

        if let Some(ua) = lookup(USER_AGENT_ENV).filter(|s| !s.is_empty()) {
            self.user_agent = Some(ua);
        }

        self
    }

    /// Check that a race can run with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if let Some(endpoint) = self.endpoints.iter().find(|e| !e.has_placeholder()) {
            return Err(ConfigError::MissingPlaceholder {
                label: endpoint.label.clone(),
                template: endpoint.url_template.clone(),
                placeholder: CEP_PLACEHOLDER,
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
