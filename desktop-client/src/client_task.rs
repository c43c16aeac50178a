use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use common::config::ConfigContentProvider;
use common::games::SessionRng;
use common::games::snake::{
    GameMode, GameOverSummary, SessionCommand, SnakeGameState, SnakeSession, SnakeSettings,
};
use common::log;
use common::protocol::{LeaderboardEntry, PlayerInfo};
use common::reporting::{ReportEvent, ScoreReporter, ScoreService, ServiceError, run_report_task};
use common::GameId;

use crate::api_client::{ApiClient, ApiError};
use crate::broadcaster::SharedStateBroadcaster;
use crate::config::Config;
use crate::leaderboard::best_per_user;
use crate::router::{Route, View, resolve_view};
use crate::state::{ClientCommand, GameCommand, GameViewState, SharedState};
use crate::user_context::UserContext;

/// Upper bound on draining queued reports when the window closes.
const REPORT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

struct ActiveGame {
    game_id: GameId,
    commands: mpsc::UnboundedSender<SessionCommand>,
    handle: JoinHandle<GameOverSummary>,
}

impl ActiveGame {
    fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            log!("[game:{}] session already closed, dropping {:?}", self.game_id, command);
        }
    }

    /// Stops the session and waits until it has queued its final report.
    async fn stop(self) -> Option<GameOverSummary> {
        self.send(SessionCommand::Stop);
        match self.handle.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                log!("[game:{}] session task failed: {}", self.game_id, e);
                None
            }
        }
    }
}

enum PollResult {
    Leaderboard(Result<Vec<LeaderboardEntry>, ApiError>),
    Players(Result<Vec<PlayerInfo>, ApiError>),
}

struct ClientTask<P: ConfigContentProvider> {
    api: ApiClient,
    user_context: UserContext<P>,
    shared_state: SharedState,
    reporter: ScoreReporter,
    settings: SnakeSettings,
    active_game: Option<ActiveGame>,
    mode: GameMode,
    polls: JoinSet<PollResult>,
}

/// Owns everything that is not drawing: the login, the running game and the
/// polling of remote lists. Returns after [`ClientCommand::Shutdown`] once the
/// last report has been delivered or the flush timed out.
pub async fn client_task<P: ConfigContentProvider>(
    config: Config,
    api: ApiClient,
    user_context: UserContext<P>,
    shared_state: SharedState,
    initial_route: Option<Route>,
    mut command_rx: mpsc::UnboundedReceiver<ClientCommand>,
) {
    let (reporter, report_rx) = ScoreReporter::channel();
    let (rejected_tx, mut rejected_rx) = mpsc::unbounded_channel();
    let report_handle = tokio::spawn(run_report_task(report_rx, api.clone(), rejected_tx));

    api.set_token(user_context.token().map(str::to_string));
    match api.health().await {
        Ok(health) => log!("Score server is {}", health.status),
        Err(e) => log!("Score server unreachable: {}", e),
    }

    let mut task = ClientTask {
        api,
        user_context,
        shared_state,
        reporter,
        settings: config.game.clone(),
        active_game: None,
        mode: GameMode::default(),
        polls: JoinSet::new(),
    };

    let current_user = task.user_context.current_user().cloned();
    task.shared_state.update(|state| state.user = current_user);
    let initial_token = initial_route.map(|route| route.token()).unwrap_or_default();
    task.navigate(initial_token).await;

    let mut poll_timer = tokio::time::interval(config.polling.interval());
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    poll_timer.reset();

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    ClientCommand::Login { username } => task.login(&username).await,
                    ClientCommand::Logout => task.logout().await,
                    ClientCommand::Navigate(route) => {
                        task.navigate(route.token()).await;
                        poll_timer.reset();
                    }
                    ClientCommand::Game(game_command) => task.handle_game_command(game_command).await,
                    ClientCommand::Shutdown => break,
                }
            }
            _ = poll_timer.tick() => task.poll(),
            Some(event) = rejected_rx.recv() => task.report_rejected(event).await,
            Some(joined) = task.polls.join_next() => match joined {
                Ok(result) => task.apply_poll(result),
                Err(e) => log!("Poll task failed: {}", e),
            },
        }
    }

    task.finish_game().await;

    let ClientTask { reporter, shared_state, .. } = task;
    drop(reporter);
    if tokio::time::timeout(REPORT_SHUTDOWN_TIMEOUT, report_handle).await.is_err() {
        log!("Gave up waiting for pending score reports");
    }

    log!("Client task finished");
    shared_state.set_should_close();
}

impl<P: ConfigContentProvider> ClientTask<P> {
    async fn navigate(&mut self, token: &str) {
        let view = resolve_view(token, self.user_context.is_authenticated());
        let previous = self.shared_state.update(|state| std::mem::replace(&mut state.view, view));
        log!("Navigating to {} ({:?})", token, view);

        if previous == View::Game && view != View::Game {
            self.finish_game().await;
        }

        match view {
            View::Game if self.active_game.is_none() => self.start_game().await,
            View::Leaderboard | View::WatchPlayers => self.poll(),
            _ => {}
        }
    }

    async fn login(&mut self, username: &str) {
        let username = username.trim();
        if username.is_empty() {
            self.shared_state.update(|state| state.login.error = Some("Username cannot be empty".to_string()));
            return;
        }

        self.shared_state.update(|state| {
            state.login.pending = true;
            state.login.error = None;
        });

        match self.api.login(username).await {
            Ok(response) => {
                log!("Logged in as {} ({})", response.username, response.id);
                self.api.set_token(Some(response.token.clone()));
                if let Err(e) = self.user_context.sign_in(response) {
                    log!("Failed to persist login: {}", e);
                }
                let user = self.user_context.current_user().cloned();
                self.shared_state.update(|state| {
                    state.login.pending = false;
                    state.user = user;
                });
                self.navigate(Route::Game.token()).await;
            }
            Err(e) => {
                log!("Login failed: {}", e);
                self.shared_state.update(|state| {
                    state.login.pending = false;
                    state.login.error = Some(format!("Login failed: {}", e));
                });
            }
        }
    }

    async fn logout(&mut self) {
        self.finish_game().await;
        self.sign_out();
        self.navigate(Route::Login.token()).await;
    }

    fn sign_out(&mut self) {
        if let Err(e) = self.user_context.sign_out() {
            log!("Failed to remove stored login: {}", e);
        }
        self.api.set_token(None);
        self.shared_state.update(|state| state.user = None);
    }

    async fn handle_game_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::Input(action) => {
                if let Some(game) = &self.active_game {
                    game.send(SessionCommand::Input(action));
                }
            }
            GameCommand::ToggleMode => {
                self.mode = self.mode.toggled();
                if let Some(game) = &self.active_game {
                    game.send(SessionCommand::ToggleMode);
                }
            }
            GameCommand::Reset => {
                self.finish_game().await;
                if self.shared_state.get_state().view == View::Game {
                    self.start_game().await;
                }
            }
        }
    }

    async fn start_game(&mut self) {
        let Some(user) = self.user_context.current_user().cloned() else {
            return;
        };

        self.shared_state.update(|state| {
            state.game = GameViewState {
                starting: true,
                ..GameViewState::default()
            };
        });

        let game_id = match self.api.start_session(user.id, self.mode).await {
            Ok(game_id) => game_id,
            Err(e) => {
                log!("Failed to start a game for {}: {}", user.username, e);
                self.shared_state.update(|state| state.game.starting = false);
                if e.is_unauthorized() {
                    self.sign_out();
                    self.shared_state.update(|state| state.view = View::Login);
                }
                self.shared_state.set_error(format!("Failed to initialize game: {}", e));
                return;
            }
        };

        let mut rng = SessionRng::from_random();
        let game_state = SnakeGameState::new(self.settings.clone(), self.mode, &mut rng);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let broadcaster = SharedStateBroadcaster::new(self.shared_state.clone(), game_id);

        self.shared_state.update(|state| {
            state.game = GameViewState {
                game_id: Some(game_id),
                starting: false,
                snapshot: Some(game_state.snapshot()),
                game_over: None,
            };
        });

        let handle = tokio::spawn(SnakeSession::run(
            game_id,
            game_state,
            rng,
            command_rx,
            broadcaster,
            self.reporter.clone(),
        ));

        self.active_game = Some(ActiveGame { game_id, commands, handle });
    }

    async fn finish_game(&mut self) {
        let Some(game) = self.active_game.take() else {
            return;
        };
        if let Some(summary) = game.stop().await {
            log!("[game:{}] finished with {} points", summary.game_id, summary.score);
        }
        self.reporter.flush().await;
    }

    fn poll(&mut self) {
        let view = self.shared_state.get_state().view;
        let api = self.api.clone();

        match view {
            View::Leaderboard => {
                self.polls.spawn(async move {
                    PollResult::Leaderboard(api.leaderboard().await.map(best_per_user))
                });
            }
            View::WatchPlayers => {
                self.polls.spawn(async move { PollResult::Players(api.players().await) });
            }
            View::Game | View::Login => {}
        }
    }

    /// The server refused a score or status report for the stored login.
    async fn report_rejected(&mut self, event: ReportEvent) {
        if !self.user_context.is_authenticated() {
            return;
        }
        log!("Stored login was rejected while reporting {:?}, signing out", event);
        self.sign_out();
        self.navigate(Route::Login.token()).await;
    }

    fn apply_poll(&mut self, result: PollResult) {
        let unauthorized = match &result {
            PollResult::Leaderboard(Err(e)) | PollResult::Players(Err(e)) => e.is_unauthorized(),
            _ => false,
        };

        self.shared_state.update(|state| match result {
            PollResult::Leaderboard(result) => state.leaderboard.apply(result, "leaderboard"),
            PollResult::Players(result) => state.players.apply(result, "players"),
        });

        if unauthorized && self.user_context.is_authenticated() {
            log!("Stored login was rejected, signing out");
            self.sign_out();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::MemoryContentProvider;
    use common::protocol::LoginResponse;
    use common::UserId;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use snake_server::{ScoreStore, build_router, handlers};
    use tokio::net::TcpListener;

    struct Harness {
        commands: mpsc::UnboundedSender<ClientCommand>,
        shared_state: SharedState,
        store: ScoreStore,
        session_storage: MemoryContentProvider,
        handle: JoinHandle<()>,
    }

    async fn start(user_context: impl FnOnce(MemoryContentProvider) -> UserContext<MemoryContentProvider>) -> Harness {
        let store = ScoreStore::new();
        start_with(store.clone(), build_router(store), user_context).await
    }

    async fn start_with(
        store: ScoreStore,
        router: Router,
        user_context: impl FnOnce(MemoryContentProvider) -> UserContext<MemoryContentProvider>,
    ) -> Harness {
        common::logger::init_logger(None);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });

        let api = ApiClient::new(&format!("http://{}", addr), Duration::from_secs(5));
        let session_storage = MemoryContentProvider::new();
        let context = user_context(session_storage.clone());
        let shared_state = SharedState::new();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(client_task(
            Config::default(),
            api,
            context,
            shared_state.clone(),
            None,
            command_rx,
        ));

        Harness { commands, shared_state, store, session_storage, handle }
    }

    async fn wait_for(shared_state: &SharedState, what: &str, check: impl Fn(&crate::state::AppState) -> bool) {
        for _ in 0..200 {
            if check(&shared_state.get_state()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {}", what);
    }

    #[tokio::test]
    async fn test_login_starts_a_game() {
        let harness = start(UserContext::load).await;
        wait_for(&harness.shared_state, "login view", |s| s.view == View::Login).await;

        harness.commands.send(ClientCommand::Login { username: " ana ".into() }).unwrap();
        wait_for(&harness.shared_state, "game start", |s| s.game.game_id.is_some()).await;

        let state = harness.shared_state.get_state();
        assert_eq!(state.view, View::Game);
        assert_eq!(state.user.unwrap().username, "ana");
        assert!(harness.session_storage.raw().unwrap().contains("mock_token_for_ana"));

        let players = harness.store.active_players().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].username, "ana");

        harness.commands.send(ClientCommand::Shutdown).unwrap();
        harness.handle.await.unwrap();
        assert!(harness.shared_state.should_close());
        assert!(harness.store.active_players().await.is_empty());
    }

    #[tokio::test]
    async fn test_leaving_game_view_finishes_the_game() {
        let harness = start(UserContext::load).await;
        harness.commands.send(ClientCommand::Login { username: "bob".into() }).unwrap();
        wait_for(&harness.shared_state, "game start", |s| s.game.game_id.is_some()).await;

        harness.commands.send(ClientCommand::Navigate(Route::Leaderboard)).unwrap();
        wait_for(&harness.shared_state, "leaderboard", |s| s.leaderboard.loaded).await;

        assert!(harness.store.active_players().await.is_empty());
        let board = harness.shared_state.get_state().leaderboard.items;
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "bob");

        harness.commands.send(ClientCommand::Shutdown).unwrap();
        harness.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_replaces_the_session() {
        let harness = start(UserContext::load).await;
        harness.commands.send(ClientCommand::Login { username: "cid".into() }).unwrap();
        wait_for(&harness.shared_state, "game start", |s| s.game.game_id == Some(GameId::new(1))).await;

        harness.commands.send(ClientCommand::Game(GameCommand::Reset)).unwrap();
        wait_for(&harness.shared_state, "second game", |s| s.game.game_id == Some(GameId::new(2))).await;

        assert_eq!(harness.store.active_players().await.len(), 1);
        assert_eq!(harness.store.leaderboard().await.len(), 1);

        harness.commands.send(ClientCommand::Shutdown).unwrap();
        harness.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_clears_the_stored_login() {
        let harness = start(UserContext::load).await;
        harness.commands.send(ClientCommand::Login { username: "dee".into() }).unwrap();
        wait_for(&harness.shared_state, "game start", |s| s.game.game_id.is_some()).await;

        harness.commands.send(ClientCommand::Logout).unwrap();
        wait_for(&harness.shared_state, "login view", |s| s.view == View::Login && s.user.is_none()).await;

        assert!(harness.session_storage.raw().is_none());
        assert!(harness.store.active_players().await.is_empty());

        harness.commands.send(ClientCommand::Navigate(Route::Game)).unwrap();
        harness.commands.send(ClientCommand::Shutdown).unwrap();
        harness.handle.await.unwrap();
        assert_eq!(harness.shared_state.get_state().view, View::Login);
    }

    #[tokio::test]
    async fn test_start_failure_shows_blocking_error() {
        // Stored login for a user the fresh server has never seen.
        let harness = start(|provider| {
            let mut context = UserContext::load(provider);
            context
                .sign_in(LoginResponse {
                    id: UserId::new(99),
                    username: "ghost".into(),
                    token: "mock_token_for_ghost".into(),
                })
                .unwrap();
            context
        })
        .await;

        for _ in 0..200 {
            if harness.shared_state.get_error().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let error = harness.shared_state.get_error().unwrap();
        assert!(error.starts_with("Failed to initialize game"));
        let state = harness.shared_state.get_state();
        assert_eq!(state.view, View::Game);
        assert!(state.game.game_id.is_none());
        assert!(!state.game.starting);

        harness.commands.send(ClientCommand::Shutdown).unwrap();
        harness.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_report_clears_the_stored_login() {
        let store = ScoreStore::new();
        let user = store.login("eve").await.unwrap();
        // Accepts new games but refuses every score and status update.
        let router = Router::new()
            .route("/health", get(handlers::health))
            .route("/games", post(handlers::start_game))
            .route("/games/{game_id}/score", put(|| async { StatusCode::UNAUTHORIZED }))
            .route("/games/{game_id}/status", put(|| async { StatusCode::UNAUTHORIZED }))
            .with_state(store.clone());

        let harness = start_with(store, router, |provider| {
            let mut context = UserContext::load(provider);
            context
                .sign_in(LoginResponse {
                    id: user.id,
                    username: "eve".into(),
                    token: "mock_token_for_eve".into(),
                })
                .unwrap();
            context
        })
        .await;
        wait_for(&harness.shared_state, "game start", |s| s.game.game_id.is_some()).await;
        assert!(harness.session_storage.raw().is_some());

        harness.commands.send(ClientCommand::Navigate(Route::Leaderboard)).unwrap();
        wait_for(&harness.shared_state, "sign out", |s| s.view == View::Login && s.user.is_none()).await;
        assert!(harness.session_storage.raw().is_none());

        harness.commands.send(ClientCommand::Shutdown).unwrap();
        harness.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_first_poll_waits_a_full_interval() {
        common::logger::init_logger(None);
        let store = ScoreStore::new();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = build_router(store).layer(axum::middleware::from_fn(
            move |request: axum::extract::Request, next: axum::middleware::Next| {
                let counter = counter.clone();
                async move {
                    if request.uri().path() == "/leaderboard" {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    next.run(request).await
                }
            },
        ));
        tokio::spawn(async move { axum::serve(listener, router).await });

        let api = ApiClient::new(&format!("http://{}", addr), Duration::from_secs(5));
        let shared_state = SharedState::new();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(client_task(
            Config::default(),
            api,
            UserContext::load(MemoryContentProvider::new()),
            shared_state.clone(),
            Some(Route::Leaderboard),
            command_rx,
        ));

        wait_for(&shared_state, "leaderboard", |s| s.leaderboard.loaded).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        commands.send(ClientCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
