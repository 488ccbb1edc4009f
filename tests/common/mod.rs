//! Test doubles shared by the runtime tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use goban_client::realtime::ChannelSink;
use goban_client::{
    ApiError, ApiErrorKind, ChannelEvent, ChannelMessage, EventChannel, GameApi, MoveRequest,
    OpponentMode, PlacedStone, RealtimeConnector, SessionId, StoneColor,
};

/// In-memory [`GameApi`] that records every call.
#[derive(Debug)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    session_id: Option<String>,
    join_ok: bool,
    color: StoneColor,
    winner: StoneColor,
    board: Mutex<Vec<PlacedStone>>,
}

impl FakeApi {
    /// Issues `session_id`, accepts joins, assigns black, white wins.
    pub fn new(session_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            session_id: Some(session_id.to_string()),
            join_ok: true,
            color: StoneColor::Black,
            winner: StoneColor::White,
            board: Mutex::new(Vec::new()),
        }
    }

    /// Fails every session refresh.
    pub fn without_session() -> Self {
        Self {
            session_id: None,
            ..Self::new("")
        }
    }

    /// Rejects every join request.
    pub fn rejecting_joins(mut self) -> Self {
        self.join_ok = false;
        self
    }

    /// Assigns `color` on `/game/color`.
    pub fn with_color(mut self, color: StoneColor) -> Self {
        self.color = color;
        self
    }

    /// Replaces the board the server reports.
    pub fn set_board(&self, stones: Vec<PlacedStone>) {
        *self.board.lock().expect("board lock") = stones;
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Waits until a call equal to `call` has been recorded.
    pub async fn wait_for_call(&self, call: &str) {
        for _ in 0..200 {
            if self.calls().iter().any(|c| c == call) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("call {:?} never happened; saw {:?}", call, self.calls());
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("calls lock").push(call.into());
    }

    fn rejected(path: &str) -> ApiError {
        ApiError::new(ApiErrorKind::Status {
            status: 404,
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl GameApi for FakeApi {
    async fn refresh_session(&self) -> Result<SessionId, ApiError> {
        self.record("refresh_session");
        self.session_id
            .clone()
            .ok_or_else(|| Self::rejected("/session/refresh"))
    }

    async fn join_session(&self, target: &str) -> Result<(), ApiError> {
        self.record(format!("join_session({})", target));
        if self.join_ok {
            Ok(())
        } else {
            Err(Self::rejected("/game/create"))
        }
    }

    async fn create_ai_opponent(&self) -> Result<(), ApiError> {
        self.record("create_ai_opponent");
        Ok(())
    }

    async fn fetch_color(&self) -> Result<StoneColor, ApiError> {
        self.record("fetch_color");
        Ok(self.color)
    }

    async fn fetch_winner(&self) -> Result<StoneColor, ApiError> {
        self.record("fetch_winner");
        Ok(self.winner)
    }

    async fn fetch_board(&self) -> Result<Vec<PlacedStone>, ApiError> {
        self.record("fetch_board");
        Ok(self.board.lock().expect("board lock").clone())
    }

    async fn make_move(&self, request: MoveRequest) -> Result<(), ApiError> {
        let endpoint = match request.mode {
            OpponentMode::Human => "make_move",
            OpponentMode::Ai => "make_move_ai",
        };
        self.record(format!(
            "{}({}, {})",
            endpoint, request.coord.x, request.coord.y
        ));
        Ok(())
    }
}

/// Connector that hands its sinks to the test instead of dialing anything.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    opened: Arc<Mutex<Vec<(SessionId, ChannelSink)>>>,
}

impl ScriptedConnector {
    /// Creates a connector with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session ids channels were opened for, in order.
    pub fn opened_sessions(&self) -> Vec<SessionId> {
        self.opened
            .lock()
            .expect("opened lock")
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Pushes `event` through the latest channel.
    pub fn emit(&self, event: ChannelEvent) {
        let opened = self.opened.lock().expect("opened lock");
        let (session_id, sink) = opened.last().expect("no channel opened");
        sink.send(ChannelMessage {
            session_id: session_id.clone(),
            event,
        })
        .expect("runtime dropped the channel receiver");
    }

    /// Pushes `event` tagged with an arbitrary session id.
    pub fn emit_as(&self, session_id: &str, event: ChannelEvent) {
        let opened = self.opened.lock().expect("opened lock");
        let (_, sink) = opened.last().expect("no channel opened");
        sink.send(ChannelMessage {
            session_id: session_id.to_string(),
            event,
        })
        .expect("runtime dropped the channel receiver");
    }
}

impl RealtimeConnector for ScriptedConnector {
    fn connect(&self, session_id: &SessionId, sink: ChannelSink) -> EventChannel {
        self.opened
            .lock()
            .expect("opened lock")
            .push((session_id.clone(), sink));
        EventChannel::spawn(session_id.clone(), std::future::pending())
    }
}
