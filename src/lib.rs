//! Goban client library - terminal client for a server-authoritative 19×19 board game
//!
//! The server owns all game rules. This crate acquires a session, pairs it
//! with an opponent, listens for turn tokens on a realtime channel and keeps a
//! local picture of the game in sync by re-fetching after each token.
//!
//! # Architecture
//!
//! - **Session**: session id acquisition and opponent pairing
//! - **Realtime**: WebSocket channel relaying turn tokens, with reconnect
//! - **Reconciler**: single-owner game store; tokens in, fetches out
//! - **TUI**: join form, game screen and the board view
//!
//! # Example
//!
//! ```no_run
//! use goban_client::{ClientConfig, tui};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default().with_server_url("http://localhost:8080");
//! tui::run_tui(config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
mod cli;
mod config;
pub mod game;
pub mod realtime;
pub mod reconciler;
pub mod session;
pub mod tui;

// Crate-level exports - Configuration
pub use cli::{Cli, DEFAULT_CONFIG_FILE};
pub use config::{ClientConfig, ConfigError};

// Crate-level exports - Server access
pub use api::{ApiError, ApiErrorKind, GameApi, HttpGameApi};

// Crate-level exports - Game types
pub use game::{
    BOARD_SIZE, Board, CELL_COUNT, Cell, Coord, GamePhase, MoveRequest, OpponentMode,
    PlacedStone, StoneColor, TurnSignal,
};

// Crate-level exports - Session and realtime
pub use realtime::{
    ChannelEvent, ChannelMessage, ConnectionState, EventChannel, RealtimeConnector,
    ReconnectPolicy, WebSocketConnector,
};
pub use session::{SessionBootstrapper, SessionEvent, SessionId};

// Crate-level exports - Reconciler
pub use reconciler::{Fetch, FetchOutcome, FetchTicket, GameStore, Notice};
