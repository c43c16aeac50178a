mod app;
mod colors;
mod game;
mod leaderboard;
mod login;
mod watch_players;

pub use app::SnakeApp;
