//! JSON bodies exchanged with the recording service.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::games::snake::GameMode;
use crate::identifiers::{GameId, UserId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Idle,
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Playing => f.write_str("playing"),
            GameStatus::Idle => f.write_str("idle"),
            GameStatus::Finished => f.write_str("finished"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: UserId,
    pub username: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub user_id: UserId,
    pub game_mode: GameMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: GameStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: GameId,
    pub user_id: UserId,
    pub score: u32,
    pub game_mode: GameMode,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The user's id, not the game's.
    pub id: UserId,
    pub username: String,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: UserId,
    pub username: String,
    pub score: u32,
    pub status: GameStatus,
    pub game_mode: GameMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_game_request_shape() {
        let request = StartGameRequest {
            user_id: UserId::new(3),
            game_mode: GameMode::Walls,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "user_id": 3, "game_mode": "walls" }));
    }

    #[test]
    fn test_player_info_parses_service_payload() {
        let payload = r#"{"id":7,"username":"ana","score":40,"status":"playing","game_mode":"pass-through"}"#;
        let player: PlayerInfo = serde_json::from_str(payload).unwrap();
        assert_eq!(player.id, UserId::new(7));
        assert_eq!(player.status, GameStatus::Playing);
        assert_eq!(player.game_mode, GameMode::WrapAround);
    }

    #[test]
    fn test_status_update_lowercase() {
        let json = serde_json::to_string(&StatusUpdate { status: GameStatus::Finished }).unwrap();
        assert_eq!(json, r#"{"status":"finished"}"#);
    }
}
