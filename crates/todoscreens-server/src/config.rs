//! Server configuration
//!
//! Loaded once at startup from a TOML file. Secrets can also come from the
//! environment (`UPDATE_TOKEN`, `TODOIST_TOKEN`, `SYNCSIGN_TOKEN`), which
//! takes precedence over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use todoscreens_clients::{SyncSignConfig, TodoistConfig};
use todoscreens_core::RenderConfig;

/// Environment variable holding the webhook token
pub const UPDATE_TOKEN_ENV: &str = "UPDATE_TOKEN";
/// Environment variable holding the task service token
pub const TODOIST_TOKEN_ENV: &str = "TODOIST_TOKEN";
/// Environment variable holding the display service key
pub const SYNCSIGN_TOKEN_ENV: &str = "SYNCSIGN_TOKEN";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this config
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A required setting is empty
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Socket address to serve on
    pub bind: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Webhook authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected in the webhook path
    pub update_token: String,
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `[server]`
    pub server: ListenConfig,
    /// `[auth]`
    pub auth: AuthConfig,
    /// `[todoist]` task service
    pub todoist: TodoistConfig,
    /// `[syncsign]` display service
    pub syncsign: SyncSignConfig,
    /// `[render]`
    pub render: RenderConfig,
}

impl ServerConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay secrets from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay secrets from `lookup`, ignoring empty values
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v: &String| !v.is_empty());
        if let Some(token) = get(UPDATE_TOKEN_ENV) {
            self.auth.update_token = token;
        }
        if let Some(token) = get(TODOIST_TOKEN_ENV) {
            self.todoist.token = token;
        }
        if let Some(token) = get(SYNCSIGN_TOKEN_ENV) {
            self.syncsign.token = token;
        }
        self
    }

    /// Check the service credentials are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.todoist.token.is_empty() {
            return Err(ConfigError::Missing("todoist.token"));
        }
        if self.syncsign.token.is_empty() {
            return Err(ConfigError::Missing("syncsign.token"));
        }
        Ok(())
    }

    /// Check everything the webhook server needs is present
    pub fn validate_webhook(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.auth.update_token.is_empty() {
            return Err(ConfigError::Missing("auth.update_token"));
        }
        Ok(())
    }
}
