use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use common::games::snake::GameMode;
use common::protocol::{GameResponse, GameStatus, LeaderboardEntry, PlayerInfo, UserResponse};
use common::{GameId, UserId};

use crate::server_config::LEADERBOARD_SIZE;

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: GameId,
    pub user_id: UserId,
    pub score: u32,
    pub game_mode: GameMode,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn to_response(&self) -> GameResponse {
        GameResponse {
            id: self.id,
            user_id: self.user_id,
            score: self.score,
            game_mode: self.game_mode,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    BlankUsername,
    UserExists(String),
    UserNotFound(UserId),
    GameNotFound(GameId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::BlankUsername => write!(f, "Username must not be empty"),
            StoreError::UserExists(username) => write!(f, "User {} already exists", username),
            StoreError::UserNotFound(id) => write!(f, "User {} not found", id),
            StoreError::GameNotFound(id) => write!(f, "Game {} not found", id),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Default)]
struct StoreInner {
    users: BTreeMap<UserId, User>,
    games: BTreeMap<GameId, Game>,
    next_user_id: u64,
    next_game_id: u64,
}

impl StoreInner {
    fn find_user(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }

    fn insert_user(&mut self, username: String) -> User {
        self.next_user_id += 1;
        let user = User {
            id: UserId::new(self.next_user_id),
            username,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    fn username_of(&self, user_id: UserId) -> String {
        self.users
            .get(&user_id)
            .map(|user| user.username.clone())
            .unwrap_or_default()
    }
}

/// In-memory users and games. Ids are handed out sequentially from 1.
#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user with this name, creating it on first login.
    pub async fn login(&self, username: &str) -> Result<User, StoreError> {
        let username = validate_username(username)?;
        let mut inner = self.inner.lock().await;

        if let Some(user) = inner.find_user(username) {
            return Ok(user.clone());
        }
        Ok(inner.insert_user(username.to_string()))
    }

    pub async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let username = validate_username(username)?;
        let mut inner = self.inner.lock().await;

        if inner.find_user(username).is_some() {
            return Err(StoreError::UserExists(username.to_string()));
        }
        Ok(inner.insert_user(username.to_string()))
    }

    pub async fn start_game(&self, user_id: UserId, game_mode: GameMode) -> Result<Game, StoreError> {
        let mut inner = self.inner.lock().await;

        if !inner.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }

        inner.next_game_id += 1;
        let game = Game {
            id: GameId::new(inner.next_game_id),
            user_id,
            score: 0,
            game_mode,
            status: GameStatus::Playing,
            created_at: Utc::now(),
        };
        inner.games.insert(game.id, game.clone());
        Ok(game)
    }

    pub async fn update_score(&self, game_id: GameId, score: u32) -> Result<Game, StoreError> {
        let mut inner = self.inner.lock().await;
        let game = inner.games.get_mut(&game_id).ok_or(StoreError::GameNotFound(game_id))?;
        game.score = score;
        Ok(game.clone())
    }

    pub async fn update_status(&self, game_id: GameId, status: GameStatus) -> Result<Game, StoreError> {
        let mut inner = self.inner.lock().await;
        let game = inner.games.get_mut(&game_id).ok_or(StoreError::GameNotFound(game_id))?;
        game.status = status;
        Ok(game.clone())
    }

    /// Best finished games, highest score first. Equal scores keep game order.
    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let inner = self.inner.lock().await;

        let mut finished: Vec<&Game> = inner
            .games
            .values()
            .filter(|game| game.status == GameStatus::Finished)
            .collect();
        finished.sort_by(|a, b| b.score.cmp(&a.score));

        finished
            .into_iter()
            .take(LEADERBOARD_SIZE)
            .map(|game| LeaderboardEntry {
                id: game.user_id,
                username: inner.username_of(game.user_id),
                score: game.score,
            })
            .collect()
    }

    pub async fn active_players(&self) -> Vec<PlayerInfo> {
        let inner = self.inner.lock().await;

        inner
            .games
            .values()
            .filter(|game| game.status == GameStatus::Playing)
            .map(|game| PlayerInfo {
                id: game.user_id,
                username: inner.username_of(game.user_id),
                score: game.score,
                status: game.status,
                game_mode: game.game_mode,
            })
            .collect()
    }
}

fn validate_username(username: &str) -> Result<&str, StoreError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(StoreError::BlankUsername);
    }
    Ok(trimmed)
}
