//! Game state reconciler.
//!
//! [`GameStore`] is the single owner of everything the client shows: session
//! id, latest decoded token, assigned color, dense board, winner, opponent
//! mode, connection state and the current notice. It never talks to the
//! network itself. Tokens turn into [`Fetch`] requests, the runtime executes
//! them against a [`GameApi`] and posts the [`FetchOutcome`] back, and the
//! store decides whether the outcome is still current before applying it.
//!
//! Every fetch carries a [`FetchTicket`]. The game epoch changes on
//! `game_start` and on a new session; the sequence number changes on every
//! token. Color and winner results from an older epoch are dropped, and a
//! board result is dropped if a newer token's board has already been applied.

use derive_getters::Getters;
use derive_more::Display;
use derive_new::new;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, GameApi};
use crate::game::{
    Board, Coord, GamePhase, MoveRequest, OpponentMode, PlacedStone, StoneColor, TurnSignal,
};
use crate::realtime::ConnectionState;
use crate::session::{SessionEvent, SessionId};

/// Scope a fetch was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct FetchTicket {
    /// Game epoch at issue time.
    pub game_epoch: u64,
    /// Token sequence number at issue time.
    pub seq: u64,
}

/// A fetch the store wants performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// `GET /game/color`.
    Color(FetchTicket),
    /// `GET /game/board`.
    Board(FetchTicket),
    /// `GET /game/winner`.
    Winner(FetchTicket),
}

impl Fetch {
    /// Ticket the fetch was issued with.
    pub fn ticket(&self) -> FetchTicket {
        match self {
            Fetch::Color(t) | Fetch::Board(t) | Fetch::Winner(t) => *t,
        }
    }

    /// Performs the fetch.
    #[instrument(skip(api))]
    pub async fn run<A: GameApi + ?Sized>(self, api: &A) -> FetchOutcome {
        match self {
            Fetch::Color(ticket) => FetchOutcome::Color {
                ticket,
                result: api.fetch_color().await,
            },
            Fetch::Board(ticket) => FetchOutcome::Board {
                ticket,
                result: api.fetch_board().await,
            },
            Fetch::Winner(ticket) => FetchOutcome::Winner {
                ticket,
                result: api.fetch_winner().await,
            },
        }
    }
}

/// Completed fetch, posted back to the store.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Assigned color.
    Color {
        /// Issue scope.
        ticket: FetchTicket,
        /// Server answer.
        result: Result<StoneColor, ApiError>,
    },
    /// Board snapshot.
    Board {
        /// Issue scope.
        ticket: FetchTicket,
        /// Server answer.
        result: Result<Vec<PlacedStone>, ApiError>,
    },
    /// Winner.
    Winner {
        /// Issue scope.
        ticket: FetchTicket,
        /// Server answer.
        result: Result<StoneColor, ApiError>,
    },
}

/// User-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Notice {
    /// The session could not be obtained.
    #[display("Could not obtain a session from the server")]
    SessionUnavailable,
    /// Waiting for the other session to accept.
    #[display("Join request sent to {_0}, waiting for the game to start")]
    JoinRequested(String),
    /// `/game/create` was rejected.
    #[display("Could not find other session")]
    JoinFailed,
    /// `/game/create_ai_opponent` failed.
    #[display("Could not start a game against the AI")]
    AiRequestFailed,
    /// Paired with the AI; waiting for `game_start`.
    #[display("Playing against the AI, waiting for the game to start")]
    AiRequested,
    /// The game finished.
    #[display("{} wins", winner_label(*_0))]
    Winner(StoneColor),
    /// The realtime channel gave up reconnecting.
    #[display("Lost connection to the server")]
    ConnectionLost,
}

fn winner_label(color: StoneColor) -> &'static str {
    match color {
        StoneColor::Black => "Black",
        StoneColor::White => "White",
    }
}

/// Single owner of all client-side game state.
#[derive(Debug, Clone, Default, Getters)]
pub struct GameStore {
    session_id: Option<SessionId>,
    signal: TurnSignal,
    color: Option<StoneColor>,
    board: Board,
    winner: Option<StoneColor>,
    mode: OpponentMode,
    connection: ConnectionState,
    notice: Option<Notice>,
    #[getter(skip)]
    game_epoch: u64,
    #[getter(skip)]
    seq: u64,
    #[getter(skip)]
    board_seq: u64,
}

impl GameStore {
    /// Creates an empty store: no session, no game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current ticket.
    pub fn ticket(&self) -> FetchTicket {
        FetchTicket::new(self.game_epoch, self.seq)
    }

    /// The color that moves now, if any.
    pub fn derived_turn(&self) -> Option<StoneColor> {
        self.signal.derived_turn()
    }

    /// Coarse lifecycle stage.
    pub fn phase(&self) -> GamePhase {
        GamePhase::derive(&self.signal, self.color.is_some())
    }

    /// Whether it is this client's move.
    pub fn is_my_turn(&self) -> bool {
        matches!((self.derived_turn(), self.color), (Some(turn), Some(mine)) if turn == mine)
    }

    /// Drops the current notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Adopts a session id. A different id starts over from the lobby.
    ///
    /// Returns `true` if the session changed.
    #[instrument(skip(self))]
    pub fn set_session(&mut self, session_id: SessionId) -> bool {
        if self.session_id.as_ref() == Some(&session_id) {
            debug!("Session unchanged");
            return false;
        }
        info!("Adopting new session");
        self.session_id = Some(session_id);
        self.signal = TurnSignal::NoGame;
        self.mode = OpponentMode::Human;
        self.connection = ConnectionState::Disconnected;
        self.start_epoch();
        true
    }

    /// Folds a bootstrapper result into the store.
    ///
    /// Returns `true` if a new session was adopted and a channel should open.
    #[instrument(skip(self))]
    pub fn apply_session_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Refreshed(session_id) => return self.set_session(session_id),
            SessionEvent::RefreshFailed => self.notice = Some(Notice::SessionUnavailable),
            SessionEvent::JoinRequested { target } => {
                self.notice = Some(Notice::JoinRequested(target))
            }
            SessionEvent::JoinRejected { .. } => self.notice = Some(Notice::JoinFailed),
            SessionEvent::AiOpponentReady => {
                self.mode = OpponentMode::Ai;
                self.notice = Some(Notice::AiRequested);
            }
            SessionEvent::AiOpponentFailed => self.notice = Some(Notice::AiRequestFailed),
        }
        false
    }

    /// Handles one realtime token and returns the fetches it calls for.
    ///
    /// The decision depends on the token alone:
    /// `game_start` fetches the color, `game_complete` fetches the board and
    /// the winner, any other non-empty token fetches the board.
    #[instrument(skip(self))]
    pub fn apply_token(&mut self, token: &str) -> Vec<Fetch> {
        let signal = TurnSignal::decode(token);
        self.seq += 1;

        let fetches = match &signal {
            TurnSignal::NoGame => Vec::new(),
            TurnSignal::GameStart => {
                self.start_epoch();
                vec![Fetch::Color(self.ticket())]
            }
            TurnSignal::GameComplete => {
                vec![Fetch::Board(self.ticket()), Fetch::Winner(self.ticket())]
            }
            TurnSignal::Turn(_) => vec![Fetch::Board(self.ticket())],
            TurnSignal::Unrecognized(raw) => {
                warn!(token = %raw, "Unrecognized token, refreshing board anyway");
                vec![Fetch::Board(self.ticket())]
            }
        };

        info!(signal = %signal, fetches = fetches.len(), "Applied token");
        self.signal = signal;
        fetches
    }

    /// Records a connection state change.
    #[instrument(skip(self))]
    pub fn apply_connection_state(&mut self, state: ConnectionState) {
        self.connection = state;
        if state == ConnectionState::Failed {
            self.notice = Some(Notice::ConnectionLost);
        } else if state == ConnectionState::Connected
            && self.notice == Some(Notice::ConnectionLost)
        {
            self.notice = None;
        }
    }

    /// Fetches that bring the store back in line after a reconnect.
    ///
    /// Tokens missed while disconnected cannot be replayed, so this pulls the
    /// board again plus whatever per-game data is still missing.
    #[instrument(skip(self))]
    pub fn resync(&self) -> Vec<Fetch> {
        if !self.signal.has_game() {
            return Vec::new();
        }
        let ticket = self.ticket();
        let mut fetches = vec![Fetch::Board(ticket)];
        if self.color.is_none() {
            fetches.push(Fetch::Color(ticket));
        }
        if self.signal.is_terminal() && self.winner.is_none() {
            fetches.push(Fetch::Winner(ticket));
        }
        info!(fetches = fetches.len(), "Resync after reconnect");
        fetches
    }

    /// Applies a completed fetch if it is still current.
    ///
    /// Returns `true` if the store changed.
    #[instrument(skip(self, outcome))]
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Color { ticket, result } => {
                if !self.is_current_game(ticket) {
                    debug!(?ticket, "Dropping stale color");
                    return false;
                }
                match result {
                    Ok(color) => {
                        info!(color = %color, "Assigned color");
                        self.color = Some(color);
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Color fetch failed");
                        false
                    }
                }
            }
            FetchOutcome::Board { ticket, result } => {
                if !self.is_current_game(ticket) || ticket.seq < self.board_seq {
                    debug!(?ticket, board_seq = self.board_seq, "Dropping stale board");
                    return false;
                }
                match result {
                    Ok(snapshot) => {
                        self.board = Board::from_snapshot(&snapshot);
                        self.board_seq = ticket.seq;
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Board fetch failed");
                        false
                    }
                }
            }
            FetchOutcome::Winner { ticket, result } => {
                if !self.is_current_game(ticket) {
                    debug!(?ticket, "Dropping stale winner");
                    return false;
                }
                match result {
                    Ok(winner) => {
                        info!(winner = %winner, "Game won");
                        self.winner = Some(winner);
                        self.notice = Some(Notice::Winner(winner));
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Winner fetch failed");
                        false
                    }
                }
            }
        }
    }

    /// Client-side move gate.
    ///
    /// Passes only when the derived turn equals the assigned color and the
    /// target cell is empty. Everything else is silently ignored. The server
    /// validates again; this only saves a round trip.
    #[instrument(skip(self))]
    pub fn submit_move(&self, index: usize) -> Option<MoveRequest> {
        let Some(coord) = Coord::from_index(index) else {
            debug!("Index off the board");
            return None;
        };
        if !self.is_my_turn() {
            debug!(turn = ?self.derived_turn(), color = ?self.color, "Not this client's turn");
            return None;
        }
        if !self.board.is_empty_at(index) {
            debug!("Cell occupied");
            return None;
        }
        debug!(coord = %coord, mode = %self.mode, "Move passed the gate");
        Some(MoveRequest::new(coord, self.mode))
    }

    fn is_current_game(&self, ticket: FetchTicket) -> bool {
        ticket.game_epoch == self.game_epoch
    }

    fn start_epoch(&mut self) {
        self.game_epoch += 1;
        self.board_seq = self.seq;
        self.color = None;
        self.winner = None;
        self.board = Board::new();
        if self.notice != Some(Notice::ConnectionLost) {
            self.notice = None;
        }
    }
}
