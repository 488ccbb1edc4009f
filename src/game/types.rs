//! Core domain types for the 19×19 board.

use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 19;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Stone color, used both for the assigned color and for whose turn it is.
///
/// Serialized as the single-letter wire form (`"b"` / `"w"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum StoneColor {
    /// Black (always moves first).
    #[serde(rename = "b")]
    #[display("black")]
    Black,
    /// White.
    #[serde(rename = "w")]
    #[display("white")]
    White,
}

impl StoneColor {
    /// Parses the single-letter wire form.
    #[instrument]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" => Some(Self::Black),
            "w" => Some(Self::White),
            _ => None,
        }
    }

    /// Returns the single-letter wire form.
    pub fn code(self) -> &'static str {
        match self {
            Self::Black => "b",
            Self::White => "w",
        }
    }
}

/// A single cell of the dense board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// No stone (`n`).
    #[default]
    Empty,
    /// A stone of the given color.
    Stone(StoneColor),
}

impl Cell {
    /// Returns the single-letter form (`n`, `b`, `w`).
    pub fn code(self) -> char {
        match self {
            Cell::Empty => 'n',
            Cell::Stone(StoneColor::Black) => 'b',
            Cell::Stone(StoneColor::White) => 'w',
        }
    }

    /// Checks whether the cell holds no stone.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Board coordinate. `x` is the row, `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("({x}, {y})")]
pub struct Coord {
    /// Row, `0..19`.
    pub x: usize,
    /// Column, `0..19`.
    pub y: usize,
}

impl Coord {
    /// Creates a coordinate, or `None` when it falls outside the board.
    pub fn new(x: usize, y: usize) -> Option<Self> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then_some(Self { x, y })
    }

    /// Converts a flat row-major index to a coordinate.
    #[instrument]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| Self {
            x: index / BOARD_SIZE,
            y: index % BOARD_SIZE,
        })
    }

    /// Converts the coordinate to its flat row-major index.
    pub fn to_index(self) -> usize {
        self.x * BOARD_SIZE + self.y
    }
}

/// Flat index to coordinate: `x = i / 19`, `y = i % 19`.
pub fn index_to_coord(index: usize) -> Option<Coord> {
    Coord::from_index(index)
}

/// Coordinate to flat index: `x * 19 + y`.
pub fn coord_to_index(coord: Coord) -> usize {
    coord.to_index()
}

/// Who the session is playing against.
///
/// Decides which move endpoint is used. This is the one piece of state the
/// client trusts without confirmation from the realtime channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum OpponentMode {
    /// Another human session.
    #[default]
    #[display("human")]
    Human,
    /// The server-hosted AI.
    #[display("AI")]
    Ai,
}

/// A move that passed the client-side gate, ready to be sent.
///
/// Nothing is applied locally; the board changes only after the server
/// confirms through the realtime channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct MoveRequest {
    /// Target cell.
    pub coord: Coord,
    /// Selects the move endpoint.
    pub mode: OpponentMode,
}
