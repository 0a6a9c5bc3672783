//! Configuration loading, validation, and management for Drumbeat.
//!
//! Loads configuration from `config.toml` in the working directory (or the
//! path in `DRUMBEAT_CONFIG`) with environment variable overrides. Validates
//! all settings at startup — a missing or empty required field is a fatal
//! configuration error, not something the scheduler discovers later.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `config.toml`.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Credential tokens, one per sender identity. Required, non-empty.
    #[serde(default)]
    pub token: Vec<String>,

    /// Target channel identifiers. Required, non-empty.
    #[serde(default)]
    pub channel_id: Vec<String>,

    /// Seconds to wait between credentials.
    #[serde(default = "default_token_delay")]
    pub token_delay: u64,

    /// Seconds to wait between channel posts.
    #[serde(default = "default_message_delay")]
    pub message_delay: u64,

    /// Seconds to wait between full cycles.
    #[serde(default = "default_restart_delay")]
    pub restart_delay: u64,

    /// Path to the message catalog file.
    #[serde(default = "default_messages_file")]
    pub messages_file: PathBuf,

    /// Messaging client settings.
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_token_delay() -> u64 {
    5
}
fn default_message_delay() -> u64 {
    2
}
fn default_restart_delay() -> u64 {
    10
}
fn default_messages_file() -> PathBuf {
    PathBuf::from("chat.txt")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token", &format!("[{} REDACTED]", self.token.len()))
            .field("channel_id", &self.channel_id)
            .field("token_delay", &self.token_delay)
            .field("message_delay", &self.message_delay)
            .field("restart_delay", &self.restart_delay)
            .field("messages_file", &self.messages_file)
            .field("client", &self.client)
            .finish()
    }
}

/// Messaging client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Override the platform API base URL (testing, proxies).
    #[serde(default)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path.
    ///
    /// Environment overrides:
    /// - `DRUMBEAT_CONFIG` — alternate config file path
    /// - `DRUMBEAT_TOKEN` — comma-separated token list, replaces `token`
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("DRUMBEAT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));
        Self::load_from(&path)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Environment variable override (highest priority)
        if let Ok(tokens) = std::env::var("DRUMBEAT_TOKEN") {
            config.token = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            tracing::info!(count = config.token.len(), "Token list taken from DRUMBEAT_TOKEN");
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::MissingField("token"));
        }
        if self.token.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "token entries must not be blank".into(),
            ));
        }
        if self.channel_id.is_empty() {
            return Err(ConfigError::MissingField("channel_id"));
        }
        if self.channel_id.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "channel_id entries must not be blank".into(),
            ));
        }
        if self.client.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Generate a starter config TOML string (for `onboard`).
    pub fn starter_toml() -> &'static str {
        concat!(
            "# Drumbeat configuration\n",
            "\n",
            "# Credential tokens, one per sender identity (required)\n",
            "token = []\n",
            "\n",
            "# Target channel ids (required)\n",
            "channel_id = []\n",
            "\n",
            "# Seconds between credentials\n",
            "token_delay = 5\n",
            "\n",
            "# Seconds between channel posts\n",
            "message_delay = 2\n",
            "\n",
            "# Seconds between full cycles\n",
            "restart_delay = 10\n",
            "\n",
            "# One candidate message per line\n",
            "messages_file = \"chat.txt\"\n",
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("No {0} provided in config")]
    MissingField(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
