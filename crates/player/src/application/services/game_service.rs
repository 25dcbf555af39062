//! Game Service - `GameGatewayPort` over the backend's REST API
//!
//! Requests are validated locally before anything goes on the wire, so an
//! empty command or an over-long player name never costs a round trip.

use textquest_protocol::{
    routes, CommandRequest, CommandResponse, Difficulty, GameId, GameStateResponse,
    StartGameRequest, StartGameResponse,
};
use validator::Validate;

use crate::application::api::Api;
use crate::application::dto::{CommandOutcome, SessionSnapshot, StartedSession};
use crate::application::GatewayError;
use crate::ports::outbound::GameGatewayPort;

/// Gateway implementation backed by the typed `Api` wrapper
pub struct GameService {
    api: Api,
}

impl GameService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl GameGatewayPort for GameService {
    async fn start_session(
        &self,
        player_name: Option<String>,
        difficulty: Difficulty,
    ) -> Result<StartedSession, GatewayError> {
        let request = StartGameRequest {
            player_name: player_name.filter(|name| !name.trim().is_empty()),
            difficulty: Some(difficulty),
        };
        request.validate()?;

        let response: StartGameResponse = self.api.post(routes::START_GAME, &request).await?;
        tracing::info!(
            game_id = %response.game_id,
            difficulty = %difficulty,
            "Started game session"
        );
        Ok(response.into())
    }

    async fn submit_command(
        &self,
        session_id: GameId,
        command: &str,
    ) -> Result<CommandOutcome, GatewayError> {
        let request = CommandRequest {
            command: command.to_string(),
            game_id: session_id,
        };
        request.validate()?;

        let response: CommandResponse = self.api.post(routes::SUBMIT_COMMAND, &request).await?;
        tracing::debug!(
            game_id = %session_id,
            success = response.success,
            "Command processed"
        );
        Ok(response.into())
    }

    async fn fetch_session_state(
        &self,
        session_id: GameId,
    ) -> Result<SessionSnapshot, GatewayError> {
        let response: GameStateResponse = self.api.get(&routes::game_state(session_id)).await?;
        Ok(response.into())
    }
}
