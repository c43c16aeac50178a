use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use common::log;
use common::protocol::{
    CreateUserRequest, GameResponse, HealthResponse, LeaderboardEntry, LoginRequest, LoginResponse,
    PlayerInfo, ScoreUpdate, StartGameRequest, StatusUpdate, UserResponse,
};
use common::GameId;

use crate::api_error::ApiError;
use crate::score_store::ScoreStore;
use crate::server_config::TOKEN_PREFIX;

pub async fn login(
    State(store): State<ScoreStore>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = store.login(&request.username).await?;
    log!("User {} logged in as {}", user.id, user.username);

    Ok(Json(LoginResponse {
        id: user.id,
        token: format!("{}{}", TOKEN_PREFIX, user.username),
        username: user.username,
    }))
}

pub async fn create_user(
    State(store): State<ScoreStore>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = store.create_user(&request.username).await?;
    log!("Created user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user.to_response())))
}

pub async fn start_game(
    State(store): State<ScoreStore>,
    Json(request): Json<StartGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let game = store.start_game(request.user_id, request.game_mode).await?;
    log!("Game {} started for user {} in {} mode", game.id, game.user_id, game.game_mode);
    Ok((StatusCode::CREATED, Json(game.to_response())))
}

pub async fn update_score(
    State(store): State<ScoreStore>,
    Path(game_id): Path<u64>,
    Json(update): Json<ScoreUpdate>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = store.update_score(GameId::new(game_id), update.score).await?;
    Ok(Json(game.to_response()))
}

pub async fn update_status(
    State(store): State<ScoreStore>,
    Path(game_id): Path<u64>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = store.update_status(GameId::new(game_id), update.status).await?;
    log!("Game {} is now {} with {} points", game.id, game.status, game.score);
    Ok(Json(game.to_response()))
}

pub async fn leaderboard(State(store): State<ScoreStore>) -> Json<Vec<LeaderboardEntry>> {
    Json(store.leaderboard().await)
}

pub async fn players(State(store): State<ScoreStore>) -> Json<Vec<PlayerInfo>> {
    Json(store.active_players().await)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy".to_string() })
}
