//! Cursor movement for keyboard navigation on the board.

use crossterm::event::KeyCode;

use crate::game::{BOARD_SIZE, CELL_COUNT};

/// Cell the cursor starts on: the center point.
pub const CURSOR_START: usize = CELL_COUNT / 2;

/// Moves the cursor one cell for an arrow key, stopping at the edges.
///
/// Up and down change the row (`x`), left and right the column (`y`).
pub fn move_cursor(cursor: usize, key: KeyCode) -> usize {
    let x = cursor / BOARD_SIZE;
    let y = cursor % BOARD_SIZE;

    let (x, y) = match key {
        KeyCode::Up => (x.saturating_sub(1), y),
        KeyCode::Down => ((x + 1).min(BOARD_SIZE - 1), y),
        KeyCode::Left => (x, y.saturating_sub(1)),
        KeyCode::Right => (x, (y + 1).min(BOARD_SIZE - 1)),
        _ => (x, y),
    };

    x * BOARD_SIZE + y
}
