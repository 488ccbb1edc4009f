//! Tests for the board view, cursor movement and the two screens.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, layout::Rect, widgets::Widget};

use goban_client::tui::{
    BoardView, CURSOR_START, GameLayout, GameScreen, JoinFormScreen, Screen, UserIntent,
    move_cursor,
};
use goban_client::{
    Board, Cell, FetchOutcome, GameStore, PlacedStone, SessionEvent, StoneColor,
};

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn lobby_store() -> GameStore {
    let mut store = GameStore::new();
    store.apply_session_event(SessionEvent::Refreshed("S1".to_string()));
    store
}

fn playing_store(mine: StoneColor) -> GameStore {
    let mut store = lobby_store();
    let fetches = store.apply_token("game_start");
    store.apply_fetch(FetchOutcome::Color {
        ticket: fetches[0].ticket(),
        result: Ok(mine),
    });
    store
}

#[test]
fn test_glyphs() {
    assert_eq!(BoardView::glyph(Cell::Empty), " ");
    assert_eq!(BoardView::glyph(Cell::Stone(StoneColor::Black)), "●");
    assert_eq!(BoardView::glyph(Cell::Stone(StoneColor::White)), "○");
}

#[test]
fn test_board_view_places_stones_by_row_and_column() {
    let board = Board::from_snapshot(&[
        PlacedStone::new(3, 4, StoneColor::Black),
        PlacedStone::new(0, 18, StoneColor::White),
    ]);
    let (width, height) = BoardView::required_size();
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    BoardView::new(&board).render(area, &mut buf);

    assert_eq!(buf[(8, 3)].symbol(), "●");
    assert_eq!(buf[(36, 0)].symbol(), "○");
    assert_eq!(buf[(0, 0)].symbol(), " ");
}

#[test]
fn test_hit_test_maps_to_flat_index() {
    let area = Rect::new(10, 5, 38, 19);
    assert_eq!(BoardView::hit_test(area, 10, 5), Some(0));
    // Both columns of a cell map to it.
    assert_eq!(BoardView::hit_test(area, 18, 8), Some(61));
    assert_eq!(BoardView::hit_test(area, 19, 8), Some(61));
    assert_eq!(BoardView::hit_test(area, 47, 23), Some(360));
}

#[test]
fn test_hit_test_outside_board() {
    let area = Rect::new(10, 5, 38, 19);
    assert_eq!(BoardView::hit_test(area, 9, 5), None);
    assert_eq!(BoardView::hit_test(area, 10, 4), None);
    assert_eq!(BoardView::hit_test(area, 48, 5), None);
    assert_eq!(BoardView::hit_test(area, 10, 24), None);
}

#[test]
fn test_cursor_moves_and_clamps() {
    assert_eq!(CURSOR_START, 180);
    assert_eq!(move_cursor(180, KeyCode::Up), 161);
    assert_eq!(move_cursor(180, KeyCode::Down), 199);
    assert_eq!(move_cursor(180, KeyCode::Left), 179);
    assert_eq!(move_cursor(180, KeyCode::Right), 181);
    assert_eq!(move_cursor(0, KeyCode::Up), 0);
    assert_eq!(move_cursor(0, KeyCode::Left), 0);
    assert_eq!(move_cursor(360, KeyCode::Down), 360);
    assert_eq!(move_cursor(360, KeyCode::Right), 360);
}

#[test]
fn test_join_form_shows_session_id() {
    let store = lobby_store();
    let screen = JoinFormScreen::new();
    let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
    terminal
        .draw(|frame| screen.render(frame, &store))
        .expect("draw");

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("Your session ID: S1"), "{}", text);
    assert!(text.contains("Goban - Lobby"), "{}", text);
}

#[test]
fn test_join_form_keys() {
    let store = lobby_store();
    let mut screen = JoinFormScreen::new();

    assert_eq!(screen.handle_key(key(KeyCode::Enter), &store), UserIntent::Idle);
    for c in "S2x".chars() {
        screen.handle_key(key(KeyCode::Char(c)), &store);
    }
    screen.handle_key(key(KeyCode::Backspace), &store);
    assert_eq!(screen.input(), "S2");
    assert_eq!(
        screen.handle_key(key(KeyCode::Enter), &store),
        UserIntent::JoinSession("S2".to_string())
    );

    let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
    assert_eq!(screen.handle_key(ctrl_a, &store), UserIntent::PlayAi);
    assert_eq!(screen.input(), "S2");
    assert_eq!(screen.handle_key(key(KeyCode::Esc), &store), UserIntent::Quit);
}

#[test]
fn test_game_screen_shows_color_and_turn() {
    let store = playing_store(StoneColor::Black);
    let screen = GameScreen::new();
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
    terminal
        .draw(|frame| screen.render(frame, &store))
        .expect("draw");

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("You are playing black"), "{}", text);
    assert!(text.contains("Goban - session S1"), "{}", text);
    assert!(text.contains("Turn: black"), "{}", text);
}

#[test]
fn test_game_screen_shows_winner() {
    let mut store = playing_store(StoneColor::Black);
    let fetches = store.apply_token("game_complete");
    store.apply_fetch(FetchOutcome::Winner {
        ticket: fetches[1].ticket(),
        result: Ok(StoneColor::White),
    });

    let screen = GameScreen::new();
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
    terminal
        .draw(|frame| screen.render(frame, &store))
        .expect("draw");

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("White wins"), "{}", text);
    assert!(text.contains("game over"), "{}", text);
}

#[test]
fn test_game_screen_keys() {
    let store = playing_store(StoneColor::Black);
    let mut screen = GameScreen::new();

    assert_eq!(screen.handle_key(key(KeyCode::Up), &store), UserIntent::Idle);
    assert_eq!(screen.cursor(), 161);
    assert_eq!(
        screen.handle_key(key(KeyCode::Enter), &store),
        UserIntent::SubmitMove(161)
    );
    assert_eq!(
        screen.handle_key(key(KeyCode::Char(' ')), &store),
        UserIntent::SubmitMove(161)
    );
    assert_eq!(screen.handle_key(key(KeyCode::Char('q')), &store), UserIntent::Quit);
}

#[test]
fn test_game_screen_click_submits_cell() {
    let store = playing_store(StoneColor::Black);
    let mut screen = GameScreen::new();
    let area = Rect::new(0, 0, 80, 30);
    let board = GameLayout::compute(area).board;

    let intent = screen.handle_mouse(click(board.x + 8, board.y + 3), area, &store);
    assert_eq!(intent, UserIntent::SubmitMove(61));
    assert_eq!(screen.cursor(), 61);

    let outside = screen.handle_mouse(click(0, 0), area, &store);
    assert_eq!(outside, UserIntent::Idle);
}

#[test]
fn test_layout_fits_board() {
    let layout = GameLayout::compute(Rect::new(0, 0, 80, 30));
    let (width, height) = BoardView::required_size();
    assert_eq!(layout.board.width, width);
    assert_eq!(layout.board.height, height);
}
