//! Game screen: color, turn, the board and the status line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, instrument};

use crate::game::{GamePhase, OpponentMode, StoneColor};
use crate::reconciler::{GameStore, Notice};
use crate::tui::board_view::BoardView;
use crate::tui::input::{CURSOR_START, move_cursor};
use crate::tui::screen::{Screen, UserIntent};

/// Screen regions, computed from the terminal area alone so rendering and
/// mouse hit-testing agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    /// Color / turn / opponent block.
    pub header: Rect,
    /// Bordered board block.
    pub board_block: Rect,
    /// Board cells, inside the border.
    pub board: Rect,
    /// Notice and connection line.
    pub status: Rect,
}

impl GameLayout {
    /// Splits `area` into the game screen regions.
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(21),   // Board
                Constraint::Length(3), // Status
            ])
            .split(area);

        let (width, height) = BoardView::required_size();
        let board_block = center_rect(chunks[1], width + 2, height + 2);
        let board = Block::default().borders(Borders::ALL).inner(board_block);

        Self {
            header: chunks[0],
            board_block,
            board,
            status: chunks[2],
        }
    }
}

/// The in-game screen.
#[derive(Debug, Clone)]
pub struct GameScreen {
    cursor: usize,
}

impl GameScreen {
    /// Creates the screen with the cursor on the center point.
    pub fn new() -> Self {
        Self {
            cursor: CURSOR_START,
        }
    }

    /// Cell under the keyboard cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn color_label(store: &GameStore) -> String {
        match store.color() {
            Some(color) => format!("You are playing {}", color),
            None if store.phase() == GamePhase::AwaitingColor => {
                "Waiting for color assignment…".to_string()
            }
            None => "Your color: unknown".to_string(),
        }
    }

    fn turn_label(store: &GameStore) -> String {
        if store.signal().is_terminal() {
            return "Turn: game over".to_string();
        }
        match store.derived_turn() {
            Some(turn) if store.is_my_turn() => format!("Turn: {} (your move)", turn),
            Some(turn) => format!("Turn: {}", turn),
            None => "Turn: unknown".to_string(),
        }
    }

    fn status_line(store: &GameStore) -> Line<'static> {
        let notice = match (store.winner(), store.notice()) {
            (Some(winner), _) => Span::styled(
                Notice::Winner(*winner).to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            (None, Some(notice)) => {
                Span::styled(notice.to_string(), Style::default().fg(Color::Yellow))
            }
            (None, None) => Span::raw(""),
        };
        let connection = Span::styled(
            format!("   [{}]", store.connection()),
            Style::default().fg(Color::DarkGray),
        );
        Line::from(vec![notice, connection])
    }
}

impl Default for GameScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for GameScreen {
    #[instrument(skip_all)]
    fn render(&self, frame: &mut Frame, store: &GameStore) {
        let layout = GameLayout::compute(frame.area());

        let opponent = match store.mode() {
            OpponentMode::Human => "Opponent: human",
            OpponentMode::Ai => "Opponent: AI",
        };
        let color_style = match store.color() {
            Some(StoneColor::Black) => Style::default().fg(Color::White).bg(Color::Black),
            Some(StoneColor::White) => Style::default().fg(Color::Black).bg(Color::White),
            None => Style::default().fg(Color::Yellow),
        };
        let header = Paragraph::new(vec![
            Line::from(Span::styled(Self::color_label(store), color_style)),
            Line::from(format!("{}   {}", Self::turn_label(store), opponent)),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .title(format!(
                    "Goban - session {}",
                    store.session_id().as_deref().unwrap_or("?")
                ))
                .title_alignment(Alignment::Center),
        );
        frame.render_widget(header, layout.header);

        frame.render_widget(Block::default().borders(Borders::ALL), layout.board_block);
        frame.render_widget(
            BoardView::new(store.board()).cursor(Some(self.cursor)),
            layout.board,
        );

        let status = Paragraph::new(Self::status_line(store))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("←↑↓→ move · Enter place · click place · q quit"),
            );
        frame.render_widget(status, layout.status);
    }

    #[instrument(skip(self, _store))]
    fn handle_key(&mut self, key: KeyEvent, _store: &GameStore) -> UserIntent {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => UserIntent::Quit,
            KeyCode::Char('q') | KeyCode::Esc => UserIntent::Quit,
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key.code);
                UserIntent::Idle
            }
            KeyCode::Enter | KeyCode::Char(' ') => UserIntent::SubmitMove(self.cursor),
            KeyCode::Char('d') => UserIntent::DismissNotice,
            _ => UserIntent::Idle,
        }
    }

    #[instrument(skip(self, _store))]
    fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect, _store: &GameStore) -> UserIntent {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return UserIntent::Idle;
        }
        let layout = GameLayout::compute(area);
        match BoardView::hit_test(layout.board, mouse.column, mouse.row) {
            Some(index) => {
                debug!(index, "Board clicked");
                self.cursor = index;
                UserIntent::SubmitMove(index)
            }
            None => UserIntent::Idle,
        }
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
