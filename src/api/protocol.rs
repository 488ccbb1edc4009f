//! Wire types for the game server's REST endpoints.

use serde::{Deserialize, Serialize};

use crate::game::Coord;

/// Path of the session refresh endpoint.
pub const SESSION_REFRESH: &str = "/session/refresh";
/// Path of the join endpoint.
pub const GAME_CREATE: &str = "/game/create";
/// Path of the AI pairing endpoint.
pub const GAME_CREATE_AI: &str = "/game/create_ai_opponent";
/// Path of the assigned color endpoint.
pub const GAME_COLOR: &str = "/game/color";
/// Path of the winner endpoint.
pub const GAME_WINNER: &str = "/game/winner";
/// Path of the board snapshot endpoint.
pub const GAME_BOARD: &str = "/game/board";
/// Path of the move endpoint against a human.
pub const GAME_MAKE_MOVE: &str = "/game/make_move";
/// Path of the move endpoint against the AI.
pub const GAME_MAKE_MOVE_AI: &str = "/game/make_move_ai";
/// Path of the realtime WebSocket endpoint.
pub const GAME_CONNECT: &str = "/game/connect";

/// The `{message: ...}` envelope used by most endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Payload.
    pub message: String,
}

impl MessageBody {
    /// Wraps a payload.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a move submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveBody {
    /// Row.
    pub x: usize,
    /// Column.
    pub y: usize,
}

impl From<Coord> for MoveBody {
    fn from(coord: Coord) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
        }
    }
}
