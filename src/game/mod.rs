//! Game domain: colors, cells, the dense board and the decoded turn signal.

mod board;
mod signal;
mod types;

pub use board::{Board, PlacedStone};
pub use signal::{GAME_COMPLETE, GAME_START, GamePhase, TurnSignal};
pub use types::{
    BOARD_SIZE, CELL_COUNT, Cell, Coord, MoveRequest, OpponentMode, StoneColor, coord_to_index,
    index_to_coord,
};
