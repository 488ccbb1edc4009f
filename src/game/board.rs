//! Dense 19×19 board rebuilt from sparse server snapshots.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::types::{CELL_COUNT, Cell, Coord, StoneColor};

/// One placed stone as reported by `GET /game/board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedStone {
    /// Row.
    pub x: i64,
    /// Column.
    pub y: i64,
    /// Stone color.
    pub c: StoneColor,
}

impl PlacedStone {
    /// Creates a placed-stone record.
    pub fn new(x: i64, y: i64, c: StoneColor) -> Self {
        Self { x, y, c }
    }

    /// Returns the coordinate when it lies on the board.
    pub fn coord(&self) -> Option<Coord> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        Coord::new(x, y)
    }
}

/// Dense row-major board of exactly 361 cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an all-empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Rebuilds a full board from a sparse snapshot.
    ///
    /// Every coordinate missing from the snapshot is empty. Records outside
    /// the board are dropped; a later record for the same cell wins.
    #[instrument(skip(snapshot), fields(stones = snapshot.len()))]
    pub fn from_snapshot(snapshot: &[PlacedStone]) -> Self {
        let mut board = Self::new();
        for stone in snapshot {
            match stone.coord() {
                Some(coord) => board.cells[coord.to_index()] = Cell::Stone(stone.c),
                None => warn!(x = stone.x, y = stone.y, "Dropping off-board stone from snapshot"),
            }
        }
        debug!(occupied = board.occupied(), "Rebuilt board from snapshot");
        board
    }

    /// Gets the cell at a flat index.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Gets the cell at a coordinate.
    pub fn at(&self, coord: Coord) -> Cell {
        self.cells[coord.to_index()]
    }

    /// Checks whether the cell at `index` exists and is empty.
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Single-letter encoding of the board (`n`/`b`/`w`), row-major.
    pub fn codes(&self) -> String {
        self.cells.iter().map(|c| c.code()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
