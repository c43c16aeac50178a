use std::sync::{Arc, Mutex};
use common::games::snake::{GameOverSummary, GameSnapshot, InputAction};
use common::protocol::{LeaderboardEntry, PlayerInfo};
use common::GameId;
use eframe::egui;

use crate::router::{Route, View};
use crate::user_context::CurrentUser;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    Login { username: String },
    Logout,
    Navigate(Route),
    Game(GameCommand),
    /// Window is closing: finish the running game and stop the client task.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Input(InputAction),
    ToggleMode,
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GameViewState {
    pub game_id: Option<GameId>,
    pub starting: bool,
    pub snapshot: Option<GameSnapshot>,
    pub game_over: Option<GameOverSummary>,
}

/// A polled list. Items from the last good fetch stay visible after a failure.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: vec![],
            loaded: false,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn apply<E: std::fmt::Display>(&mut self, result: Result<Vec<T>, E>, what: &str) {
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(format!("Failed to load {}: {}", what, e));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub user: Option<CurrentUser>,
    pub login: LoginState,
    pub game: GameViewState,
    pub leaderboard: ListState<LeaderboardEntry>,
    pub players: ListState<PlayerInfo>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Login,
            user: None,
            login: LoginState::default(),
            game: GameViewState::default(),
            leaderboard: ListState::default(),
            players: ListState::default(),
        }
    }
}

pub struct SharedState {
    state: Arc<Mutex<AppState>>,
    error: Arc<Mutex<Option<String>>>,
    should_close: Arc<Mutex<bool>>,
    context: Arc<Mutex<Option<egui::Context>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::default())),
            error: Arc::new(Mutex::new(None)),
            should_close: Arc::new(Mutex::new(false)),
            context: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get_state(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }

    /// Mutates the state in place and wakes the UI.
    pub fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let result = f(&mut self.state.lock().unwrap());
        self.request_repaint();
        result
    }

    pub fn set_error(&self, error: String) {
        *self.error.lock().unwrap() = Some(error);
        self.request_repaint();
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }

    pub fn clear_error(&self) {
        *self.error.lock().unwrap() = None;
    }

    pub fn set_should_close(&self) {
        *self.should_close.lock().unwrap() = true;
        self.request_repaint();
    }

    pub fn should_close(&self) -> bool {
        *self.should_close.lock().unwrap()
    }

    pub fn has_context(&self) -> bool {
        self.context.lock().unwrap().is_some()
    }

    pub fn set_context(&self, ctx: egui::Context) {
        *self.context.lock().unwrap() = Some(ctx);
    }

    fn request_repaint(&self) {
        if let Some(ctx) = self.context.lock().unwrap().as_ref() {
            ctx.request_repaint();
        }
    }
}

impl Clone for SharedState {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            error: Arc::clone(&self.error),
            should_close: Arc::clone(&self.should_close),
            context: Arc::clone(&self.context),
        }
    }
}
