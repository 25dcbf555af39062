//! API error type shared by the raw HTTP boundary and its wrappers.

/// Errors produced by the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The connection could not be established; the request never left the client
    #[error("Could not reach the game server: {0}")]
    Connect(String),

    /// The request was sent but the exchange failed (reset, truncated body, ...)
    #[error("Network error: {0}")]
    RequestFailed(String),

    /// No response within the configured timeout
    #[error("The game server took too long to respond")]
    Timeout,

    /// Non-2xx status; `message` is the server-supplied text when available
    #[error("{message}")]
    HttpError { status: u16, message: String },

    /// A 2xx body that is not the JSON we expected
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Failed to serialize request: {0}")]
    SerializeError(String),
}

impl ApiError {
    /// Whether the request provably never reached the server.
    pub fn is_connect(&self) -> bool {
        matches!(self, ApiError::Connect(_))
    }

    /// HTTP status for server rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
