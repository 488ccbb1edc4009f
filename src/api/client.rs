//! REST client for the game server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Response, Url};
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, ApiErrorKind};
use super::protocol::{
    GAME_BOARD, GAME_COLOR, GAME_CREATE, GAME_CREATE_AI, GAME_MAKE_MOVE, GAME_MAKE_MOVE_AI,
    GAME_WINNER, MessageBody, MoveBody, SESSION_REFRESH,
};
use crate::game::{MoveRequest, OpponentMode, PlacedStone, StoneColor};
use crate::session::SessionId;

/// Operations the client performs against the game server.
///
/// Every call carries the session credential implicitly (the server's
/// session cookie). Implementations must be cheap to share across tasks.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// `POST /session/refresh`: obtains or renews the session id.
    async fn refresh_session(&self) -> Result<SessionId, ApiError>;

    /// `POST /game/create`: asks to play against another session.
    async fn join_session(&self, target: &str) -> Result<(), ApiError>;

    /// `POST /game/create_ai_opponent`: asks to play against the AI.
    async fn create_ai_opponent(&self) -> Result<(), ApiError>;

    /// `GET /game/color`: the color assigned to this session.
    async fn fetch_color(&self) -> Result<StoneColor, ApiError>;

    /// `GET /game/winner`: the winner of the finished game.
    async fn fetch_winner(&self) -> Result<StoneColor, ApiError>;

    /// `GET /game/board`: sparse snapshot of placed stones.
    async fn fetch_board(&self) -> Result<Vec<PlacedStone>, ApiError>;

    /// `POST /game/make_move` or `/game/make_move_ai`, depending on the mode.
    async fn make_move(&self, request: MoveRequest) -> Result<(), ApiError>;
}

/// [`GameApi`] over HTTP with a shared cookie jar.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    base_url: Url,
    client: reqwest::Client,
    cookies: Arc<Jar>,
}

impl HttpGameApi {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(timeout)
            .build()?;

        info!("Created HTTP game client");
        Ok(Self {
            base_url,
            client,
            cookies,
        })
    }

    /// Base URL of the game server.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Cookie header the jar would send to `url`, if any.
    ///
    /// The realtime channel uses this to carry the session credential on
    /// the WebSocket upgrade request.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        self.cookies
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Resolves an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Turns a non-success status into [`ApiErrorKind::Status`].
    #[track_caller]
    fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::new(ApiErrorKind::Status {
                status: status.as_u16(),
                path: path.to_string(),
            }))
        }
    }

    #[instrument(skip(self))]
    async fn get_message(&self, path: &str) -> Result<MessageBody, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        let body: MessageBody = Self::check_status(path, response)?.json().await?;
        debug!(message = %body.message, "Received message body");
        Ok(body)
    }

    #[instrument(skip(self))]
    async fn get_color(&self, path: &str) -> Result<StoneColor, ApiError> {
        let body = self.get_message(path).await?;
        StoneColor::from_code(&body.message).ok_or_else(|| {
            ApiError::new(ApiErrorKind::Decode(format!(
                "expected \"b\" or \"w\", got {:?}",
                body.message
            )))
        })
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    #[instrument(skip(self))]
    async fn refresh_session(&self) -> Result<SessionId, ApiError> {
        let response = self
            .client
            .post(self.endpoint(SESSION_REFRESH)?)
            .send()
            .await?;
        let body: MessageBody = Self::check_status(SESSION_REFRESH, response)?
            .json()
            .await?;
        info!(session_id = %body.message, "Session refreshed");
        Ok(body.message)
    }

    #[instrument(skip(self))]
    async fn join_session(&self, target: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(GAME_CREATE)?)
            .json(&MessageBody::new(target))
            .send()
            .await?;
        // Only an exact 200 counts as a successful join.
        if response.status() != reqwest::StatusCode::OK {
            warn!(status = %response.status(), "Join rejected");
            return Err(ApiError::new(ApiErrorKind::Status {
                status: response.status().as_u16(),
                path: GAME_CREATE.to_string(),
            }));
        }
        info!("Join request accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_ai_opponent(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(GAME_CREATE_AI)?)
            .send()
            .await?;
        Self::check_status(GAME_CREATE_AI, response)?;
        info!("AI opponent requested");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_color(&self) -> Result<StoneColor, ApiError> {
        self.get_color(GAME_COLOR).await
    }

    #[instrument(skip(self))]
    async fn fetch_winner(&self) -> Result<StoneColor, ApiError> {
        self.get_color(GAME_WINNER).await
    }

    #[instrument(skip(self))]
    async fn fetch_board(&self) -> Result<Vec<PlacedStone>, ApiError> {
        let response = self.client.get(self.endpoint(GAME_BOARD)?).send().await?;
        let stones: Vec<PlacedStone> = Self::check_status(GAME_BOARD, response)?.json().await?;
        debug!(stones = stones.len(), "Fetched board snapshot");
        Ok(stones)
    }

    #[instrument(skip(self), fields(coord = %request.coord, mode = %request.mode))]
    async fn make_move(&self, request: MoveRequest) -> Result<(), ApiError> {
        let path = match request.mode {
            OpponentMode::Human => GAME_MAKE_MOVE,
            OpponentMode::Ai => GAME_MAKE_MOVE_AI,
        };
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(&MoveBody::from(request.coord))
            .send()
            .await?;
        Self::check_status(path, response)?;
        info!(path, "Move submitted");
        Ok(())
    }
}
