//! Decoding of the overloaded realtime token.
//!
//! The server pushes one string that doubles as a phase indicator and, once
//! play has begun, a turn indicator. It is decoded exactly once, at the
//! channel boundary, into [`TurnSignal`]; every consumer works with the enum.

use derive_more::Display;
use tracing::instrument;

use super::types::StoneColor;

/// Token announcing that a game has been created.
pub const GAME_START: &str = "game_start";

/// Token announcing that the game is over.
pub const GAME_COMPLETE: &str = "game_complete";

/// Decoded realtime token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Display)]
pub enum TurnSignal {
    /// No token received yet (`""`).
    #[default]
    #[display("no game")]
    NoGame,
    /// A game was created; black moves first.
    #[display("game start")]
    GameStart,
    /// The given color moves now.
    #[display("{_0} to move")]
    Turn(StoneColor),
    /// The game is over.
    #[display("game complete")]
    GameComplete,
    /// A token this client does not know. Still triggers a board refresh.
    #[display("unrecognized token {_0:?}")]
    Unrecognized(String),
}

impl TurnSignal {
    /// Decodes a raw token.
    #[instrument]
    pub fn decode(token: &str) -> Self {
        match token {
            "" => Self::NoGame,
            GAME_START => Self::GameStart,
            GAME_COMPLETE => Self::GameComplete,
            other => match StoneColor::from_code(other) {
                Some(color) => Self::Turn(color),
                None => Self::Unrecognized(other.to_string()),
            },
        }
    }

    /// The color whose move it is.
    ///
    /// `GameStart` means black. Terminal, empty and unknown tokens have no
    /// mover, so no move can pass the gate.
    pub fn derived_turn(&self) -> Option<StoneColor> {
        match self {
            Self::GameStart => Some(StoneColor::Black),
            Self::Turn(color) => Some(*color),
            Self::NoGame | Self::GameComplete | Self::Unrecognized(_) => None,
        }
    }

    /// Checks whether gameplay has begun (anything but `NoGame`).
    pub fn has_game(&self) -> bool {
        !matches!(self, Self::NoGame)
    }

    /// Checks whether the game is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameComplete)
    }
}

/// Coarse lifecycle stage derived from the latest token and the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GamePhase {
    /// No game yet; the join form is shown.
    Lobby,
    /// `game_start` received, color not known yet.
    #[display("awaiting color")]
    AwaitingColor,
    /// Game in progress.
    #[display("in game")]
    InGame,
    /// Game over.
    Complete,
}

impl GamePhase {
    /// Derives the phase from the current signal and whether a color is known.
    pub fn derive(signal: &TurnSignal, has_color: bool) -> Self {
        match signal {
            TurnSignal::NoGame => Self::Lobby,
            TurnSignal::GameStart if !has_color => Self::AwaitingColor,
            TurnSignal::GameComplete => Self::Complete,
            TurnSignal::GameStart | TurnSignal::Turn(_) | TurnSignal::Unrecognized(_) => {
                Self::InGame
            }
        }
    }
}
