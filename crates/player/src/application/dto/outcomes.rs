//! Gateway results in client terms.
//!
//! Wire responses are converted here so the session store never sees
//! protocol field names.

use textquest_protocol::{CommandResponse, GameId, GameStateResponse, StartGameResponse};

use super::{Inventory, PlayerStats};

/// A freshly created session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedSession {
    pub session_id: GameId,
    pub stats: PlayerStats,
    pub inventory: Inventory,
    pub description: String,
    pub room_title: Option<String>,
    pub welcome_message: String,
    pub suggested_actions: Option<Vec<String>>,
    pub sound_cue: Option<String>,
}

impl From<StartGameResponse> for StartedSession {
    fn from(response: StartGameResponse) -> Self {
        Self {
            session_id: response.game_id,
            stats: response.player_stats.into(),
            inventory: response.inventory.into(),
            description: response.description,
            room_title: response.room_title,
            welcome_message: response.message,
            suggested_actions: response.suggested_actions,
            sound_cue: response.sound_effect,
        }
    }
}

/// Result of one submitted command.
///
/// `success == false` means the action failed inside the story; stats and
/// inventory are still authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
    pub description: String,
    pub room_title: Option<String>,
    pub stats: PlayerStats,
    pub inventory: Inventory,
    pub suggested_actions: Option<Vec<String>>,
    pub sound_cue: Option<String>,
}

impl From<CommandResponse> for CommandOutcome {
    fn from(response: CommandResponse) -> Self {
        Self {
            success: response.success,
            message: response.message,
            description: response.description,
            room_title: response.room_title,
            stats: response.player_stats.into(),
            inventory: response.updated_inventory.into(),
            suggested_actions: response.suggested_actions,
            sound_cue: response.sound_effect,
        }
    }
}

/// Current state of an existing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: GameId,
    pub stats: PlayerStats,
    pub inventory: Inventory,
    pub description: String,
    pub room_title: Option<String>,
    pub message: Option<String>,
    pub sound_cue: Option<String>,
}

impl From<GameStateResponse> for SessionSnapshot {
    fn from(response: GameStateResponse) -> Self {
        Self {
            session_id: response.game_id,
            stats: response.player_stats.into(),
            inventory: response.inventory.into(),
            description: response.description,
            room_title: response.room_title,
            message: response.message,
            sound_cue: response.sound_effect,
        }
    }
}
