//! Goban client - terminal client for a server-hosted 19×19 board game.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use goban_client::{Cli, tui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    tui::run_tui(config).await
}
