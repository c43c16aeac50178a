pub mod api_error;
pub mod handlers;
pub mod score_store;
pub mod server_config;
pub mod web_server;

pub use score_store::ScoreStore;
pub use web_server::{build_router, run_web_server};
