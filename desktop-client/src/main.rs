mod api_client;
mod broadcaster;
mod client_task;
mod config;
mod leaderboard;
mod router;
mod state;
mod ui;
mod user_context;

use std::time::Duration;
use clap::Parser;
use common::{log, logger};
use eframe::egui;
use tokio::sync::mpsc;

use api_client::ApiClient;
use client_task::client_task;
use config::{Config, get_config_manager};
use router::Route;
use state::SharedState;
use ui::SnakeApp;
use user_context::UserContext;

/// How long the window waits for the final score report before closing anyway.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "snake_client")]
struct Args {
    /// Overrides `server.address` from the config file.
    #[arg(long)]
    server: Option<String>,

    /// Route token to open first, e.g. `#leaderboard`.
    #[arg(long)]
    route: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = get_config_manager().get_config().unwrap_or_else(|e| {
        log!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    if let Some(server) = args.server {
        config.server.address = server;
    }

    let initial_route = args.route.as_deref().and_then(Route::from_token);
    let api = ApiClient::new(&config.server.address, config.server.request_timeout());
    let user_context = UserContext::from_default_file();
    log!("Using score server at {}", config.server.address);

    let shared_state = SharedState::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let shared_state_clone = shared_state.clone();

    let runtime_thread = std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log!("Failed to start async runtime: {}", e);
                shared_state_clone.set_error(format!("Failed to start async runtime: {}", e));
                return;
            }
        };
        rt.block_on(client_task(
            config,
            api,
            user_context,
            shared_state_clone,
            initial_route,
            command_rx,
        ));
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 760.0])
            .with_min_inner_size([480.0, 600.0])
            .with_title("Snake Game"),
        ..Default::default()
    };

    eframe::run_native(
        "Snake Game",
        options,
        Box::new(|_cc| {
            Ok(Box::new(SnakeApp::new(
                shared_state,
                command_tx,
                SHUTDOWN_TIMEOUT,
            )))
        }),
    )?;

    if runtime_thread.join().is_err() {
        log!("Client runtime thread panicked");
    }

    Ok(())
}
