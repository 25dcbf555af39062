//! Gateway error type
//!
//! Every failure of the three gateway operations collapses into
//! `GatewayError`, so the session store handles start, command and fetch
//! failures the same way.

use crate::ports::outbound::ApiError;

/// Errors that can occur in gateway operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Network unreachable or the exchange broke off
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response; `message` prefers the server's own text
    #[error("{message}")]
    ServerRejected { status: u16, message: String },

    #[error("The game server did not respond in time.")]
    Timeout,

    /// 2xx response whose body did not match the expected schema
    #[error("Unexpected response from the game server: {0}")]
    InvalidResponse(String),

    /// Rejected locally before any network call
    #[error("{0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Check if the backend no longer knows the session
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::ServerRejected { status: 404, .. })
    }
}

impl From<ApiError> for GatewayError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::HttpError { status, message } => {
                GatewayError::ServerRejected { status, message }
            }
            ApiError::Timeout => GatewayError::Timeout,
            ApiError::ParseError(msg) => GatewayError::InvalidResponse(msg),
            ApiError::SerializeError(msg) => GatewayError::InvalidRequest(msg),
            other @ (ApiError::Connect(_) | ApiError::RequestFailed(_)) => {
                GatewayError::Transport(other.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        let message = fields
            .iter()
            .map(|field| match field.as_str() {
                "player_name" => format!(
                    "Player name must be at most {} characters.",
                    textquest_protocol::MAX_PLAYER_NAME_LEN
                ),
                "command" => "Command cannot be empty.".to_string(),
                "game_id" => "Session id is not valid.".to_string(),
                other => format!("Invalid {other}."),
            })
            .collect::<Vec<_>>()
            .join(" ");

        GatewayError::InvalidRequest(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejection_keeps_status_and_message() {
        let err: GatewayError = ApiError::HttpError {
            status: 404,
            message: "Game session not found.".into(),
        }
        .into();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Game session not found.");
    }

    #[test]
    fn connect_failure_becomes_transport_with_readable_message() {
        let err: GatewayError = ApiError::Connect("connection refused".into()).into();
        assert_eq!(
            err,
            GatewayError::Transport("Could not reach the game server: connection refused".into())
        );
    }

    #[test]
    fn validation_errors_name_the_offending_field() {
        use validator::Validate;

        let request = textquest_protocol::CommandRequest {
            command: String::new(),
            game_id: textquest_protocol::GameId::new(3),
        };
        let err: GatewayError = request.validate().unwrap_err().into();
        assert_eq!(
            err,
            GatewayError::InvalidRequest("Command cannot be empty.".into())
        );
    }
}
