//! Game Gateway Port - the three logical operations against the game backend
//!
//! The session store depends on this trait only. `GameService` implements it
//! over HTTP; tests use the generated `MockGameGatewayPort` or scripted fakes.

use textquest_protocol::{Difficulty, GameId};

use crate::application::dto::{CommandOutcome, SessionSnapshot, StartedSession};
use crate::application::GatewayError;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameGatewayPort: Send + Sync {
    /// Create a new session on the backend
    async fn start_session(
        &self,
        player_name: Option<String>,
        difficulty: Difficulty,
    ) -> Result<StartedSession, GatewayError>;

    /// Submit one free-text command for the given session.
    ///
    /// An in-fiction failure is `Ok` with `success == false`.
    async fn submit_command(
        &self,
        session_id: GameId,
        command: &str,
    ) -> Result<CommandOutcome, GatewayError>;

    /// Read the current session snapshot
    async fn fetch_session_state(&self, session_id: GameId)
        -> Result<SessionSnapshot, GatewayError>;
}
