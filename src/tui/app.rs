//! Client runtime: owns the store, the realtime channel and the screens.
//!
//! Everything that touches the network runs in spawned tasks and posts its
//! result back as a message. Only the runtime mutates the [`GameStore`].

use std::sync::Arc;

use crossterm::event::{Event, KeyEventKind};
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::api::GameApi;
use crate::game::MoveRequest;
use crate::realtime::{ChannelEvent, ChannelMessage, ChannelSink, EventChannel, RealtimeConnector};
use crate::reconciler::{Fetch, FetchOutcome, GameStore};
use crate::session::{SessionBootstrapper, SessionEvent};
use crate::tui::screen::{Screen, UserIntent};
use crate::tui::screens::{GameScreen, JoinFormScreen};

/// Result of a background task.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A bootstrapper request finished.
    Session(SessionEvent),
    /// A fetch finished.
    Fetched(FetchOutcome),
}

/// The client runtime.
pub struct App<A: GameApi + ?Sized + 'static, C: RealtimeConnector> {
    api: Arc<A>,
    connector: C,
    bootstrapper: SessionBootstrapper<A>,
    store: GameStore,
    channel: Option<EventChannel>,
    messages_tx: mpsc::UnboundedSender<AppMessage>,
    messages_rx: mpsc::UnboundedReceiver<AppMessage>,
    channel_tx: ChannelSink,
    channel_rx: mpsc::UnboundedReceiver<ChannelMessage>,
    join_form: JoinFormScreen,
    game_screen: GameScreen,
    area: Rect,
    should_quit: bool,
}

impl<A: GameApi + ?Sized + 'static, C: RealtimeConnector> App<A, C> {
    /// Creates a runtime over `api`, opening channels through `connector`.
    pub fn new(api: Arc<A>, connector: C) -> Self {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        let (channel_tx, channel_rx) = mpsc::unbounded_channel();
        Self {
            bootstrapper: SessionBootstrapper::new(Arc::clone(&api)),
            api,
            connector,
            store: GameStore::new(),
            channel: None,
            messages_tx,
            messages_rx,
            channel_tx,
            channel_rx,
            join_form: JoinFormScreen::new(),
            game_screen: GameScreen::new(),
            area: Rect::default(),
            should_quit: false,
        }
    }

    /// Current game state.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Session of the open realtime channel, if any.
    pub fn channel_session(&self) -> Option<&str> {
        self.channel.as_ref().map(|c| c.session_id().as_str())
    }

    /// Join form state.
    pub fn join_form(&self) -> &JoinFormScreen {
        &self.join_form
    }

    /// Game screen state.
    pub fn game_screen(&self) -> &GameScreen {
        &self.game_screen
    }

    /// Kicks off session acquisition.
    #[instrument(skip(self))]
    pub fn start(&self) {
        info!("Requesting session");
        let bootstrapper = self.bootstrapper.clone();
        let tx = self.messages_tx.clone();
        tokio::spawn(async move {
            let event = bootstrapper.refresh_session().await;
            let _ = tx.send(AppMessage::Session(event));
        });
    }

    /// Waits for the next background message and applies it.
    ///
    /// Returns `false` once nothing can arrive anymore.
    pub async fn step(&mut self) -> bool {
        tokio::select! {
            Some(message) = self.messages_rx.recv() => {
                self.handle_message(message);
                true
            }
            Some(message) = self.channel_rx.recv() => {
                self.handle_channel(message);
                true
            }
            else => false,
        }
    }

    /// Applies every message already waiting. Returns how many there were.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.messages_rx.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        while let Ok(message) = self.channel_rx.try_recv() {
            self.handle_channel(message);
            handled += 1;
        }
        handled
    }

    /// Applies a background task result.
    #[instrument(skip(self))]
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Session(event) => {
                if self.store.apply_session_event(event) {
                    self.open_channel();
                }
            }
            AppMessage::Fetched(outcome) => {
                self.store.apply_fetch(outcome);
            }
        }
    }

    /// Applies a realtime channel event.
    #[instrument(skip(self))]
    pub fn handle_channel(&mut self, message: ChannelMessage) {
        if self.store.session_id().as_ref() != Some(&message.session_id) {
            debug!(session_id = %message.session_id, "Ignoring event from a previous session");
            return;
        }
        match message.event {
            ChannelEvent::Token(token) => {
                let fetches = self.store.apply_token(&token);
                self.dispatch(fetches);
            }
            ChannelEvent::State(state) => self.store.apply_connection_state(state),
            ChannelEvent::Reconnected => {
                let fetches = self.store.resync();
                self.dispatch(fetches);
            }
        }
    }

    /// Acts on what a screen handed back.
    #[instrument(skip(self))]
    pub fn handle_intent(&mut self, intent: UserIntent) {
        match intent {
            UserIntent::Idle => {}
            UserIntent::JoinSession(target) => {
                let bootstrapper = self.bootstrapper.clone();
                let tx = self.messages_tx.clone();
                tokio::spawn(async move {
                    let event = bootstrapper.join_session(target).await;
                    let _ = tx.send(AppMessage::Session(event));
                });
            }
            UserIntent::PlayAi => {
                let bootstrapper = self.bootstrapper.clone();
                let tx = self.messages_tx.clone();
                tokio::spawn(async move {
                    let event = bootstrapper.request_ai_opponent().await;
                    let _ = tx.send(AppMessage::Session(event));
                });
            }
            UserIntent::SubmitMove(index) => match self.store.submit_move(index) {
                Some(request) => self.send_move(request),
                None => debug!(index, "Move rejected locally"),
            },
            UserIntent::DismissNotice => self.store.clear_notice(),
            UserIntent::Quit => {
                info!("User quit");
                self.should_quit = true;
                if let Some(channel) = self.channel.take() {
                    channel.close();
                }
            }
        }
    }

    /// Routes a terminal event to the visible screen.
    #[instrument(skip(self))]
    pub fn handle_terminal_event(&mut self, event: Event) {
        let in_game = self.store.signal().has_game();
        let intent = match event {
            Event::Key(key) if key.kind == KeyEventKind::Release => UserIntent::Idle,
            Event::Key(key) if in_game => self.game_screen.handle_key(key, &self.store),
            Event::Key(key) => self.join_form.handle_key(key, &self.store),
            Event::Mouse(mouse) if in_game => {
                self.game_screen
                    .handle_mouse(mouse, self.area, &self.store)
            }
            Event::Mouse(mouse) => self.join_form.handle_mouse(mouse, self.area, &self.store),
            _ => UserIntent::Idle,
        };
        self.handle_intent(intent);
    }

    /// Renders the visible screen: the join form until the first token,
    /// the game screen after.
    pub fn draw(&mut self, frame: &mut Frame) {
        self.area = frame.area();
        if self.store.signal().has_game() {
            self.game_screen.render(frame, &self.store);
        } else {
            self.join_form.render(frame, &self.store);
        }
    }

    fn open_channel(&mut self) {
        let Some(session_id) = self.store.session_id().clone() else {
            return;
        };
        if let Some(previous) = self.channel.take() {
            previous.close();
        }
        info!(session_id = %session_id, "Opening realtime channel for session");
        self.channel = Some(self.connector.connect(&session_id, self.channel_tx.clone()));
    }

    fn dispatch(&self, fetches: Vec<Fetch>) {
        for fetch in fetches {
            let api = Arc::clone(&self.api);
            let tx = self.messages_tx.clone();
            tokio::spawn(async move {
                let outcome = fetch.run(api.as_ref()).await;
                let _ = tx.send(AppMessage::Fetched(outcome));
            });
        }
    }

    fn send_move(&self, request: MoveRequest) {
        info!(?request, "Submitting move");
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            // The board change arrives through the realtime channel.
            if let Err(e) = api.make_move(request).await {
                match e.status() {
                    Some(status) => warn!(status, error = %e, "Server rejected move"),
                    None => error!(error = %e, "Move request failed"),
                }
            }
        });
    }
}
