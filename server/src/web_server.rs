use std::future::Future;
use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use common::log;

use crate::handlers;
use crate::score_store::ScoreStore;

pub fn build_router(store: ScoreStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/login", post(handlers::login))
        .route("/users", post(handlers::create_user))
        .route("/games", post(handlers::start_game))
        .route("/games/{game_id}/score", put(handlers::update_score))
        .route("/games/{game_id}/status", put(handlers::update_status))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/players", get(handlers::players))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(store)
}

/// Serves the recording API on an already bound listener until `shutdown` resolves.
pub async fn run_web_server(
    listener: TcpListener,
    store: ScoreStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log!("Score server listening on {}", addr);
    }

    axum::serve(listener, build_router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
