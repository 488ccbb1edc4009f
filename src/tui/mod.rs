//! Terminal UI for the goban client.

mod app;
mod board_view;
mod input;
mod screen;
mod screens;

pub use app::{App, AppMessage};
pub use board_view::{BoardView, CELL_WIDTH};
pub use input::{CURSOR_START, move_cursor};
pub use screen::{Screen, UserIntent};
pub use screens::{GameLayout, GameScreen, JoinFormScreen};

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};

use crate::api::{GameApi, HttpGameApi};
use crate::config::ClientConfig;
use crate::realtime::{RealtimeConnector, WebSocketConnector};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the client until the user quits.
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so tracing output does not tear the terminal.
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %config.server_url(), "Starting goban client");

    let api = HttpGameApi::new(config.server_url(), config.request_timeout())?;
    let realtime_url = config.resolve_realtime_url()?;
    info!(realtime_url = %realtime_url, "Realtime channel endpoint");
    let connector = WebSocketConnector::new(realtime_url, api.clone(), *config.reconnect());
    let mut app = App::new(Arc::new(api), connector);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Client loop error");
        eprintln!("Error: {:?}", err);
    }

    info!("Goban client stopped");
    Ok(())
}

#[instrument(skip_all)]
fn run_loop<A, C>(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App<A, C>) -> Result<()>
where
    A: GameApi + ?Sized + 'static,
    C: RealtimeConnector,
{
    loop {
        app.drain();
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(POLL_INTERVAL)? {
            let event = event::read()?;
            app.handle_terminal_event(event);
        }

        if app.should_quit() {
            info!("Leaving client loop");
            return Ok(());
        }
    }
}
