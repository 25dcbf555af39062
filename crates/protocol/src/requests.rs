//! Request bodies sent to the game backend.
//!
//! Validation limits match the backend's request schema so obviously bad
//! requests are rejected before they cost a round-trip.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::GameId;

/// Longest player name the backend accepts
pub const MAX_PLAYER_NAME_LEN: usize = 50;

/// `MAX_PLAYER_NAME_LEN` typed as `u64`, as required by the `validator` derive.
const MAX_PLAYER_NAME_LEN_U64: u64 = MAX_PLAYER_NAME_LEN as u64;

/// Game difficulty selected at start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" | "" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// `POST /game/start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_PLAYER_NAME_LEN_U64))]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// `POST /game/command`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommandRequest {
    #[validate(length(min = 1))]
    pub command: String,
    #[validate(custom(function = "validate_game_id"))]
    pub game_id: GameId,
}

fn validate_game_id(game_id: &GameId) -> Result<(), ValidationError> {
    if game_id.get() > 0 {
        Ok(())
    } else {
        Err(ValidationError::new("game_id_not_positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_uses_camel_case_and_omits_missing_fields() {
        let request = StartGameRequest {
            player_name: Some("Aria".into()),
            difficulty: Some(Difficulty::Hard),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"playerName": "Aria", "difficulty": "hard"})
        );

        let anonymous = StartGameRequest {
            player_name: None,
            difficulty: None,
        };
        assert_eq!(serde_json::to_value(&anonymous).unwrap(), json!({}));
    }

    #[test]
    fn overlong_player_name_is_rejected() {
        let request = StartGameRequest {
            player_name: Some("x".repeat(MAX_PLAYER_NAME_LEN + 1)),
            difficulty: None,
        };
        assert!(request.validate().is_err());

        let request = StartGameRequest {
            player_name: Some("x".repeat(MAX_PLAYER_NAME_LEN)),
            difficulty: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn command_request_wire_shape() {
        let request = CommandRequest {
            command: "look".into(),
            game_id: GameId::new(42),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"command": "look", "game_id": 42})
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_command_and_non_positive_id_are_rejected() {
        let empty = CommandRequest {
            command: String::new(),
            game_id: GameId::new(1),
        };
        assert!(empty.validate().is_err());

        let bad_id = CommandRequest {
            command: "look".into(),
            game_id: GameId::new(0),
        };
        assert!(bad_id.validate().is_err());
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
