//! Stateless board rendering and click-to-cell mapping.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::game::{BOARD_SIZE, Board, CELL_COUNT, Cell, StoneColor};

/// Terminal columns per board cell.
pub const CELL_WIDTH: u16 = 2;

const BOARD_BG: Color = Color::Rgb(196, 152, 92);

/// Renders the dense board as 19 rows of 19 cells.
///
/// Row `x`, column `y` holds flat index `x * 19 + y`. The view owns no
/// state; clicks are mapped back to an index with [`BoardView::hit_test`]
/// and handed to the move gate as-is.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    board: &'a Board,
    cursor: Option<usize>,
}

impl<'a> BoardView<'a> {
    /// Creates a view of `board`.
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            cursor: None,
        }
    }

    /// Highlights the cell at `cursor`.
    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Display glyph of a cell: blank, filled or open marker.
    pub fn glyph(cell: Cell) -> &'static str {
        match cell {
            Cell::Empty => " ",
            Cell::Stone(StoneColor::Black) => "●",
            Cell::Stone(StoneColor::White) => "○",
        }
    }

    /// Width and height the board needs, without borders.
    pub fn required_size() -> (u16, u16) {
        (BOARD_SIZE as u16 * CELL_WIDTH, BOARD_SIZE as u16)
    }

    /// Maps a terminal position inside `area` to a flat cell index.
    pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<usize> {
        let (width, height) = Self::required_size();
        if column < area.x || row < area.y {
            return None;
        }
        let dx = column - area.x;
        let dy = row - area.y;
        if dx >= width.min(area.width) || dy >= height.min(area.height) {
            return None;
        }
        let x = dy as usize;
        let y = (dx / CELL_WIDTH) as usize;
        Some(x * BOARD_SIZE + y)
    }

    fn style_for(cell: Cell, highlighted: bool) -> Style {
        let base = match cell {
            Cell::Empty => Style::default().fg(Color::DarkGray),
            Cell::Stone(StoneColor::Black) => {
                Style::default().fg(Color::Black).add_modifier(Modifier::BOLD)
            }
            Cell::Stone(StoneColor::White) => {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            }
        }
        .bg(BOARD_BG);

        if highlighted {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for index in 0..CELL_COUNT {
            let x = (index / BOARD_SIZE) as u16;
            let y = (index % BOARD_SIZE) as u16;
            let px = area.x + y * CELL_WIDTH;
            let py = area.y + x;
            if py >= area.bottom() || px + CELL_WIDTH > area.right() {
                continue;
            }

            let cell = self.board.cells()[index];
            let style = Self::style_for(cell, self.cursor == Some(index));
            buf.set_string(px, py, Self::glyph(cell), style);
            buf.set_string(px + 1, py, " ", style);
        }
    }
}
