//! textquest Protocol - Wire types for the game backend
//!
//! This crate contains the JSON shapes exchanged with the game backend:
//! - Request bodies (`POST /game/start`, `POST /game/command`)
//! - Response bodies for start, command and state snapshots
//! - Shared value types (player stats, inventory items, game ids)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and validator
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Wire names are authoritative** - field renames follow the backend schema

pub mod ids;
pub mod requests;
pub mod responses;
pub mod types;

pub use ids::GameId;
pub use requests::{CommandRequest, Difficulty, StartGameRequest, MAX_PLAYER_NAME_LEN};
pub use responses::{CommandResponse, ErrorBody, GameStateResponse, StartGameResponse};
pub use types::{ItemData, PlayerStatsData, RarityData};

/// Route paths relative to the API base URL.
pub mod routes {
    use crate::GameId;

    pub const START_GAME: &str = "/game/start";
    pub const SUBMIT_COMMAND: &str = "/game/command";

    /// `GET /game/state/{game_id}`
    pub fn game_state(game_id: GameId) -> String {
        format!("/game/state/{}", game_id)
    }
}
