use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Game,
    Login,
    Leaderboard,
    WatchPlayers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Game,
    Login,
    Leaderboard,
    WatchPlayers,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Game, Route::Login, Route::Leaderboard, Route::WatchPlayers];

    pub fn token(&self) -> &'static str {
        match self {
            Route::Game => "#game",
            Route::Login => "#login",
            Route::Leaderboard => "#leaderboard",
            Route::WatchPlayers => "#watch-players",
        }
    }

    pub fn from_token(token: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.token() == token)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Picks the view for a route token. Unknown tokens land on the game when
/// signed in and on the login form otherwise.
pub fn resolve_view(token: &str, authenticated: bool) -> View {
    let home = if authenticated { View::Game } else { View::Login };

    match Route::from_token(token) {
        Some(Route::Login) => View::Login,
        Some(Route::Game) => home,
        Some(Route::Leaderboard) => View::Leaderboard,
        Some(Route::WatchPlayers) => View::WatchPlayers,
        None => home,
    }
}
