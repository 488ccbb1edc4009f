//! The realtime event channel: one server-push WebSocket per session.

use std::future::Future;

use derive_more::{Display, Error};
use futures_util::StreamExt;
use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, instrument, warn};

use super::backoff::{BackoffState, ReconnectPolicy};
use crate::api::HttpGameApi;
use crate::api::protocol::GAME_CONNECT;
use crate::session::SessionId;

/// Lifecycle of the realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// First connection attempt in progress.
    Connecting,
    /// Receiving tokens.
    Connected,
    /// Waiting to retry after a drop.
    Reconnecting,
    /// Gave up.
    Failed,
}

/// What the channel reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A token, relayed verbatim.
    Token(String),
    /// The connection changed state.
    State(ConnectionState),
    /// A dropped connection was re-established; local state may be stale.
    Reconnected,
}

/// A channel event tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// Session the emitting channel was opened for.
    pub session_id: SessionId,
    /// The event.
    pub event: ChannelEvent,
}

/// Where channels deliver their events.
pub type ChannelSink = mpsc::UnboundedSender<ChannelMessage>;

/// Opens realtime channels.
pub trait RealtimeConnector: Send + Sync {
    /// Opens a channel for `session_id`, delivering events to `sink`.
    fn connect(&self, session_id: &SessionId, sink: ChannelSink) -> EventChannel;
}

/// Handle to a running channel. Dropping it closes the connection.
#[derive(Debug)]
pub struct EventChannel {
    session_id: SessionId,
    task: JoinHandle<()>,
}

impl EventChannel {
    /// Runs `driver` as the channel's connection task.
    pub fn spawn<F>(session_id: SessionId, driver: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            session_id,
            task: tokio::spawn(driver),
        }
    }

    /// Session this channel belongs to.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether the connection task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Closes the connection.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn close(self) {
        info!("Closing realtime channel");
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Realtime channel error.
#[derive(Debug, Clone, Display, Error)]
#[display("Realtime channel error: {} at {}:{}", message, file, line)]
pub struct ChannelError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ChannelError {
    /// Creates a new channel error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<tungstenite::Error> for ChannelError {
    #[track_caller]
    fn from(err: tungstenite::Error) -> Self {
        Self::new(format!("WebSocket error: {}", err))
    }
}

impl From<tungstenite::http::header::InvalidHeaderValue> for ChannelError {
    #[track_caller]
    fn from(err: tungstenite::http::header::InvalidHeaderValue) -> Self {
        Self::new(format!("Invalid session cookie: {}", err))
    }
}

/// How a single connection ended.
enum StreamEnd {
    /// The server closed, the stream failed or it ran dry.
    Dropped,
    /// Nobody is listening anymore.
    SinkClosed,
}

/// [`RealtimeConnector`] over `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: Url,
    api: HttpGameApi,
    policy: ReconnectPolicy,
}

impl WebSocketConnector {
    /// Creates a connector for `url`, borrowing the session cookie from `api`.
    pub fn new(url: Url, api: HttpGameApi, policy: ReconnectPolicy) -> Self {
        Self { url, api, policy }
    }

    /// WebSocket URL this connector dials.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Connection loop: connect, relay, and retry per the policy.
    #[instrument(skip(self, sink), fields(url = %self.url))]
    async fn run(self, session_id: SessionId, sink: ChannelSink) {
        let emit = |event: ChannelEvent| {
            sink.send(ChannelMessage {
                session_id: session_id.clone(),
                event,
            })
            .is_ok()
        };

        let mut backoff = BackoffState::new(self.policy);
        let mut established = false;

        if !emit(ChannelEvent::State(ConnectionState::Connecting)) {
            return;
        }

        loop {
            match self.connect_once(&emit, established).await {
                Ok(StreamEnd::SinkClosed) => {
                    debug!("Event sink closed, stopping channel");
                    return;
                }
                Ok(StreamEnd::Dropped) => {
                    warn!("Realtime connection dropped");
                    established = true;
                    backoff.reset();
                }
                Err(e) => {
                    warn!(error = %e, attempt = backoff.attempts(), "Realtime connection failed");
                }
            }

            if !emit(ChannelEvent::State(ConnectionState::Disconnected)) {
                return;
            }

            let Some(delay) = backoff.next_delay_and_advance() else {
                if *self.policy.enabled() {
                    error!(attempts = backoff.attempts(), "Max reconnection attempts reached, giving up");
                    emit(ChannelEvent::State(ConnectionState::Failed));
                } else {
                    info!("Reconnect disabled, channel stays closed");
                }
                return;
            };

            info!(
                attempt = backoff.attempts(),
                delay_ms = delay.as_millis() as u64,
                "Scheduling reconnection"
            );
            if !emit(ChannelEvent::State(ConnectionState::Reconnecting)) {
                return;
            }
            tokio::time::sleep(delay).await;
        }
    }

    /// One connection: handshake with the session cookie, then relay frames.
    ///
    /// Errors only when the handshake fails; once connected, every ending is
    /// a [`StreamEnd`].
    async fn connect_once<E>(&self, emit: &E, reconnect: bool) -> Result<StreamEnd, ChannelError>
    where
        E: Fn(ChannelEvent) -> bool,
    {
        let mut request = self.url.as_str().into_client_request()?;
        let cookie_url = self
            .api
            .endpoint(GAME_CONNECT)
            .map_err(|e| ChannelError::new(e.to_string()))?;
        if let Some(cookie) = self.api.cookie_header(&cookie_url) {
            request
                .headers_mut()
                .insert(COOKIE, HeaderValue::from_str(&cookie)?);
        } else {
            debug!("No session cookie available for realtime handshake");
        }

        let (mut stream, _) = connect_async(request).await?;
        info!("Realtime channel connected");

        if !emit(ChannelEvent::State(ConnectionState::Connected)) {
            return Ok(StreamEnd::SinkClosed);
        }
        if reconnect && !emit(ChannelEvent::Reconnected) {
            return Ok(StreamEnd::SinkClosed);
        }

        // Past the handshake every failure counts as a drop of an
        // established connection.
        while let Some(frame) = stream.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Realtime stream failed");
                    break;
                }
            };
            match frame {
                Message::Text(text) => {
                    debug!(token = %text, "Received token");
                    if !emit(ChannelEvent::Token(text.to_string())) {
                        return Ok(StreamEnd::SinkClosed);
                    }
                }
                Message::Close(frame) => {
                    info!(?frame, "Server closed realtime channel");
                    break;
                }
                _ => {}
            }
        }

        Ok(StreamEnd::Dropped)
    }
}

impl RealtimeConnector for WebSocketConnector {
    #[instrument(skip(self, sink))]
    fn connect(&self, session_id: &SessionId, sink: ChannelSink) -> EventChannel {
        info!("Opening realtime channel");
        let connector = self.clone();
        EventChannel::spawn(
            session_id.clone(),
            connector.run(session_id.clone(), sink),
        )
    }
}
