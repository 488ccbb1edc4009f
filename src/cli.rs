//! Command-line interface for goban_client.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ClientConfig, ConfigError};

/// Default config file, optional.
pub const DEFAULT_CONFIG_FILE: &str = "goban_client.toml";

/// Goban client - terminal client for a server-hosted 19×19 board game
#[derive(Parser, Debug)]
#[command(name = "goban_client")]
#[command(about = "Play a server-hosted 19x19 board game from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Game server URL (HTTP)
    #[arg(long)]
    pub server_url: Option<String>,

    /// Realtime channel URL (WebSocket); derived from the server URL if omitted
    #[arg(long)]
    pub realtime_url: Option<String>,

    /// File to write logs to
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not reconnect when the realtime channel drops
    #[arg(long)]
    pub no_reconnect: bool,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::load_or_default(DEFAULT_CONFIG_FILE)?,
        };

        if let Some(url) = &self.server_url {
            config = config.with_server_url(url.clone());
        }
        if let Some(url) = &self.realtime_url {
            config = config.with_realtime_url(url.clone());
        }
        if let Some(path) = &self.log_file {
            config = config.with_log_file(path.clone());
        }
        if self.no_reconnect {
            config = config.without_reconnect();
        }
        Ok(config)
    }
}
