//! Session bootstrapping: acquiring the session id and pairing with an opponent.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::api::GameApi;

/// Opaque session identifier issued by the server.
pub type SessionId = String;

/// Result of a bootstrapping request, posted back to the runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session id is available.
    Refreshed(SessionId),
    /// The server could not issue a session; nothing else happens.
    RefreshFailed,
    /// The join request was accepted; `game_start` will follow on the channel.
    JoinRequested {
        /// Session id the user asked to play against.
        target: String,
    },
    /// The join request was rejected.
    JoinRejected {
        /// Session id the user asked to play against.
        target: String,
    },
    /// The server paired this session with the AI.
    AiOpponentReady,
    /// The AI pairing request failed.
    AiOpponentFailed,
}

/// Acquires the session and issues pairing requests.
#[derive(Debug)]
pub struct SessionBootstrapper<A: ?Sized> {
    api: Arc<A>,
}

impl<A: ?Sized> Clone for SessionBootstrapper<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: GameApi + ?Sized> SessionBootstrapper<A> {
    /// Creates a bootstrapper over the given API.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Requests a new or renewed session. No retry on failure.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> SessionEvent {
        match self.api.refresh_session().await {
            Ok(session_id) => {
                info!(session_id = %session_id, "Session acquired");
                SessionEvent::Refreshed(session_id)
            }
            Err(e) => {
                error!(error = %e, "Failed to acquire session");
                SessionEvent::RefreshFailed
            }
        }
    }

    /// Asks the server to pair this session with `target`.
    ///
    /// Does not change the phase; success is only learned from the next
    /// `game_start` token.
    #[instrument(skip(self))]
    pub async fn join_session(&self, target: String) -> SessionEvent {
        match self.api.join_session(&target).await {
            Ok(()) => {
                info!(target = %target, "Join requested");
                SessionEvent::JoinRequested { target }
            }
            Err(e) => {
                warn!(target = %target, error = %e, "Could not find other session");
                SessionEvent::JoinRejected { target }
            }
        }
    }

    /// Asks the server to pair this session with the AI.
    #[instrument(skip(self))]
    pub async fn request_ai_opponent(&self) -> SessionEvent {
        match self.api.create_ai_opponent().await {
            Ok(()) => {
                info!("AI opponent ready");
                SessionEvent::AiOpponentReady
            }
            Err(e) => {
                warn!(error = %e, "AI opponent request failed");
                SessionEvent::AiOpponentFailed
            }
        }
    }
}
