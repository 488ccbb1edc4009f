//! Join form, shown until the first token arrives.
//!
//! Displays this client's session id so it can be shared, and takes the
//! opponent's session id or a request to play the AI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, instrument};

use crate::reconciler::GameStore;
use crate::tui::screen::{Screen, UserIntent};

/// State for the join form.
#[derive(Debug, Clone, Default)]
pub struct JoinFormScreen {
    input: String,
}

impl JoinFormScreen {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the session id field.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Screen for JoinFormScreen {
    #[instrument(skip_all)]
    fn render(&self, frame: &mut Frame, store: &GameStore) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Goban - Lobby")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let session_text = match store.session_id() {
            Some(id) => format!("Your session ID: {}", id),
            None => "Requesting session…".to_string(),
        };
        let session = Paragraph::new(session_text)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(session, chunks[1]);

        let field = Paragraph::new(format!("{}_", self.input))
            .block(Block::default().borders(Borders::ALL).title("Session ID"));
        frame.render_widget(field, chunks[2]);

        let help = Paragraph::new(vec![
            Line::from("Enter: join that session"),
            Line::from("Ctrl+A: play against the AI"),
            Line::from("Esc: quit"),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[3]);

        let notice = store
            .notice()
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let notice = Paragraph::new(notice)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(notice, chunks[4]);
    }

    #[instrument(skip(self, _store))]
    fn handle_key(&mut self, key: KeyEvent, _store: &GameStore) -> UserIntent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => UserIntent::Quit,
            KeyCode::Char('a') if ctrl => UserIntent::PlayAi,
            KeyCode::Esc => UserIntent::Quit,
            KeyCode::Enter => {
                let target = self.input.trim();
                if target.is_empty() {
                    debug!("Ignoring empty session id");
                    UserIntent::Idle
                } else {
                    UserIntent::JoinSession(target.to_string())
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                UserIntent::DismissNotice
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                UserIntent::DismissNotice
            }
            _ => UserIntent::Idle,
        }
    }
}
