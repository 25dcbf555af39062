//! Response bodies returned by the game backend.

use serde::{Deserialize, Serialize};

use crate::{GameId, ItemData, PlayerStatsData};

/// `POST /game/start` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    #[serde(rename = "game_id")]
    pub game_id: GameId,
    pub player_stats: PlayerStatsData,
    #[serde(default)]
    pub inventory: Vec<ItemData>,
    pub description: String,
    #[serde(default)]
    pub room_title: Option<String>,
    /// Welcome message shown once at the start of the adventure
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub suggested_actions: Option<Vec<String>>,
    #[serde(default)]
    pub sound_effect: Option<String>,
}

/// `POST /game/command` success body
///
/// `success == false` is an in-fiction failure ("you can't do that"), not a
/// transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub description: String,
    pub player_stats: PlayerStatsData,
    #[serde(default)]
    pub updated_inventory: Vec<ItemData>,
    #[serde(default)]
    pub room_title: Option<String>,
    #[serde(default)]
    pub sound_effect: Option<String>,
    #[serde(default)]
    pub suggested_actions: Option<Vec<String>>,
    #[serde(rename = "game_id", default)]
    pub game_id: Option<GameId>,
}

/// `GET /game/state/{game_id}` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    #[serde(rename = "game_id")]
    pub game_id: GameId,
    pub player_stats: PlayerStatsData,
    #[serde(default)]
    pub inventory: Vec<ItemData>,
    pub description: String,
    #[serde(default)]
    pub room_title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sound_effect: Option<String>,
}

/// Body of a non-2xx response.
///
/// The backend sends `{"error": "...", "message": "..."}`; either field may be
/// missing, so both are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The most specific human-readable message, `message` before `error`.
    pub fn best_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.trim().is_empty()))
    }
}
