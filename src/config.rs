//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::api::protocol::GAME_CONNECT;
use crate::realtime::ReconnectPolicy;

/// Configuration for the game client.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game server's REST API.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// WebSocket URL of the realtime channel. Derived from `server_url`
    /// when absent.
    #[serde(default)]
    realtime_url: Option<String>,

    /// File the tracing output goes to.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Timeout for each REST request.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Realtime reconnection behavior.
    #[serde(default)]
    reconnect: ReconnectPolicy,
}

#[instrument]
fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("goban_client.log")
}

#[instrument]
fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            realtime_url: None,
            log_file: default_log_file(),
            request_timeout_ms: default_request_timeout_ms(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the server URL.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    /// Replaces the realtime URL.
    pub fn with_realtime_url(mut self, realtime_url: impl Into<String>) -> Self {
        self.realtime_url = Some(realtime_url.into());
        self
    }

    /// Replaces the log file path.
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Turns realtime reconnection off.
    pub fn without_reconnect(mut self) -> Self {
        self.reconnect = self.reconnect.with_enabled(false);
        self
    }

    /// REST request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// WebSocket URL of the realtime channel.
    ///
    /// Uses `realtime_url` when set. Otherwise takes `server_url`, swaps
    /// `http`/`https` for `ws`/`wss` and points it at `/game/connect`.
    #[instrument(skip(self))]
    pub fn resolve_realtime_url(&self) -> Result<Url, ConfigError> {
        if let Some(url) = &self.realtime_url {
            return Url::parse(url)
                .map_err(|e| ConfigError::new(format!("Invalid realtime_url {:?}: {}", url, e)));
        }

        let mut url = Url::parse(&self.server_url).map_err(|e| {
            ConfigError::new(format!("Invalid server_url {:?}: {}", self.server_url, e))
        })?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(ConfigError::new(format!(
                    "Unsupported server_url scheme {:?}",
                    other
                )));
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| ConfigError::new(format!("Cannot use scheme {}", scheme)))?;
        url.set_path(GAME_CONNECT);
        url.set_query(None);
        debug!(url = %url, "Derived realtime URL");
        Ok(url)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
