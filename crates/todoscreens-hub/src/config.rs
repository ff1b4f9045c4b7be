//! Hub configuration

use crate::button::{Binding, ButtonMap};
use crate::trigger::WebhookConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the webhook token
pub const UPDATE_TOKEN_ENV: &str = "UPDATE_TOKEN";

/// Configuration errors
#[derive(Debug, Error)]
pub enum HubConfigError {
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

    /// A binding names a button that does not exist
    #[error("Invalid button mask {0} (expected 1, 2, 4 or 8)")]
    InvalidMask(u8),
}

/// Trigger queue settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Presses that may wait behind the one in flight
    pub depth: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { depth: 4 }
    }
}

/// Complete hub configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Server to trigger
    pub webhook: WebhookConfig,
    /// Trigger queue
    pub queue: QueueConfig,
    /// Button table, in match order
    pub buttons: Vec<Binding>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            webhook: WebhookConfig::default(),
            queue: QueueConfig::default(),
            buttons: ButtonMap::default().bindings().to_vec(),
        }
    }
}

impl HubConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, HubConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| HubConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| HubConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Take the token from `UPDATE_TOKEN` when set
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay the token from `lookup`, ignoring empty values
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup(UPDATE_TOKEN_ENV).filter(|t: &String| !t.is_empty()) {
            self.webhook.token = token;
        }
        self
    }

    /// Check the token is set and every mask names a real button
    pub fn validate(&self) -> Result<(), HubConfigError> {
        if self.webhook.token.is_empty() {
            return Err(HubConfigError::Missing("webhook.token"));
        }
        if let Some(binding) = self
            .buttons
            .iter()
            .find(|b| !matches!(b.mask, 1 | 2 | 4 | 8))
        {
            return Err(HubConfigError::InvalidMask(binding.mask));
        }
        Ok(())
    }

    /// Press -> action table built from `buttons`
    pub fn button_map(&self) -> ButtonMap {
        ButtonMap::new(self.buttons.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::HubAction;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HubConfig::load(&dir.path().join("hub.toml")).unwrap();
        assert_eq!(config.queue.depth, 4);
        assert_eq!(config.button_map(), ButtonMap::default());
        assert_matches!(config.validate(), Err(HubConfigError::Missing(_)));
    }

    #[test]
    fn test_custom_buttons() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[webhook]
base_url = "https://screens.example.net"
token = "abc"

[[buttons]]
mask = 1
action = "refresh"

[[buttons]]
mask = 8
status = 0
action = "done-1"
"#
        )
        .unwrap();

        let config = HubConfig::load(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.webhook.base_url, "https://screens.example.net");
        assert_eq!(config.buttons.len(), 2);
        assert_eq!(config.buttons[0].action, HubAction::Refresh);
        assert_eq!(config.buttons[1].action, HubAction::Done(1));
    }

    #[test]
    fn test_rejects_unknown_action() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[buttons]]\nmask = 1\naction = \"explode\"").unwrap();
        assert_matches!(HubConfig::load(file.path()), Err(HubConfigError::Parse { .. }));
    }

    #[test]
    fn test_rejects_bad_mask() {
        let mut config = HubConfig::default();
        config.webhook.token = "abc".to_string();
        config.buttons.push(Binding::pressed(3, HubAction::Refresh));
        assert_matches!(config.validate(), Err(HubConfigError::InvalidMask(3)));
    }

    #[test]
    fn test_token_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[webhook]\ntoken = \"from-file\"").unwrap();
        let config = HubConfig::load(file.path()).unwrap();

        let overridden = config
            .clone()
            .with_overrides(|key| (key == UPDATE_TOKEN_ENV).then(|| "from-env".to_string()));
        assert_eq!(overridden.webhook.token, "from-env");

        let empty = config.clone().with_overrides(|_| Some(String::new()));
        assert_eq!(empty.webhook.token, "from-file");

        let unset = config.with_overrides(|_| None);
        assert_eq!(unset.webhook.token, "from-file");
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(HubConfig::load(dir.path()), Err(HubConfigError::Io { .. }));
    }
}
