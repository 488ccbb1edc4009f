//! REST API error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong talking to the game server.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ApiErrorKind {
    /// The request never produced a response.
    #[display("HTTP request failed: {_0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[display("Server returned {status} for {path}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
    },
    /// The response body did not have the expected shape.
    #[display("Unexpected response body: {_0}")]
    Decode(String),
    /// The configured server URL could not be used.
    #[display("Invalid URL: {_0}")]
    Url(String),
}

/// REST API error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("API error: {} at {}:{}", kind, file, line)]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ApiError {
    /// Creates a new API error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ApiErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the HTTP status if the server rejected the request.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ApiErrorKind::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::new(ApiErrorKind::Decode(err.to_string()))
        } else {
            Self::new(ApiErrorKind::Transport(err.to_string()))
        }
    }
}

impl From<url::ParseError> for ApiError {
    #[track_caller]
    fn from(err: url::ParseError) -> Self {
        Self::new(ApiErrorKind::Url(err.to_string()))
    }
}
