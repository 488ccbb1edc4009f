//! Screen trait and the intents screens hand back to the runtime.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};

use crate::reconciler::GameStore;

/// What the user asked for.
///
/// Screens return this from their input handlers; only the runtime acts on
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// Nothing to do.
    Idle,
    /// Ask the server to pair with another session.
    JoinSession(String),
    /// Ask the server to pair with the AI.
    PlayAi,
    /// A board cell was clicked or selected. Goes through the move gate.
    SubmitMove(usize),
    /// Clear the current notice.
    DismissNotice,
    /// Leave the client.
    Quit,
}

/// Trait implemented by each screen.
///
/// Each screen owns only its own input state; game state is borrowed from
/// the [`GameStore`] for every call.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame, store: &GameStore);

    /// Handles a key event and returns the resulting [`UserIntent`].
    fn handle_key(&mut self, key: KeyEvent, store: &GameStore) -> UserIntent;

    /// Handles a mouse event. `area` is the full terminal area of the last
    /// render.
    fn handle_mouse(&mut self, _mouse: MouseEvent, _area: Rect, _store: &GameStore) -> UserIntent {
        UserIntent::Idle
    }
}
