//! HTTP client for the score recording service.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use common::games::snake::GameMode;
use common::protocol::{
    GameResponse, GameStatus, HealthResponse, LeaderboardEntry, LoginRequest, LoginResponse,
    PlayerInfo, ScoreUpdate, StartGameRequest, StatusUpdate,
};
use common::reporting::{ScoreService, ServiceError};
use common::{GameId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, reset, or a malformed request.
    Transport(String),
    Timeout,
    Unauthorized,
    Status { code: u16, body: String },
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "connection failed: {}", e),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Unauthorized => write!(f, "not authorized"),
            ApiError::Status { code, body } => write!(f, "server returned {}: {}", code, body),
            ApiError::Decode(e) => write!(f, "unexpected response: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl ServiceError for ApiError {
    fn is_unauthorized(&self) -> bool {
        *self == ApiError::Unauthorized
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    timeout: Duration,
    token: Arc<Mutex<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(90))
            .build(connector);

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Token sent as `Authorization: Bearer` on every following request.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    pub async fn login(&self, username: &str) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest { username: username.to_string() };
        self.send(Method::POST, "/login", Some(&request)).await
    }

    pub async fn start_game(&self, user_id: UserId, game_mode: GameMode) -> Result<GameResponse, ApiError> {
        let request = StartGameRequest { user_id, game_mode };
        self.send(Method::POST, "/games", Some(&request)).await
    }

    pub async fn put_score(&self, game_id: GameId, score: u32) -> Result<GameResponse, ApiError> {
        let path = format!("/games/{}/score", game_id);
        self.send(Method::PUT, &path, Some(&ScoreUpdate { score })).await
    }

    pub async fn put_status(&self, game_id: GameId, status: GameStatus) -> Result<GameResponse, ApiError> {
        let path = format!("/games/{}/status", game_id);
        self.send(Method::PUT, &path, Some(&StatusUpdate { status })).await
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.send::<(), _>(Method::GET, "/leaderboard", None).await
    }

    pub async fn players(&self) -> Result<Vec<PlayerInfo>, ApiError> {
        self.send::<(), _>(Method::GET, "/players", None).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.send::<(), _>(Method::GET, "/health", None).await
    }

    async fn send<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let payload = match body {
            Some(body) => serde_json::to_vec(body).map_err(|e| ApiError::Transport(e.to_string()))?,
            None => Vec::new(),
        };

        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json");

        let token = self.token.lock().unwrap().clone();
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
                .to_bytes();
            Ok::<_, ApiError>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ApiError::Timeout)??;

        check_status(status, &bytes)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn check_status(status: StatusCode, body: &[u8]) -> Result<(), ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            code: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
    Ok(())
}

impl ScoreService for ApiClient {
    type Error = ApiError;

    async fn start_session(&self, user_id: UserId, mode: GameMode) -> Result<GameId, ApiError> {
        Ok(self.start_game(user_id, mode).await?.id)
    }

    async fn update_score(&self, game_id: GameId, score: u32) -> Result<(), ApiError> {
        self.put_score(game_id, score).await.map(|_| ())
    }

    async fn update_status(&self, game_id: GameId, status: GameStatus) -> Result<(), ApiError> {
        self.put_status(game_id, status).await.map(|_| ())
    }
}
