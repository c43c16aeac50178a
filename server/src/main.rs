use clap::Parser;
use common::{log, logger};
use snake_server::server_config::{DEFAULT_HOST, DEFAULT_PORT};
use snake_server::{ScoreStore, run_web_server};

#[derive(Parser)]
#[command(name = "snake_server")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    let store = ScoreStore::new();

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutdown signal received");
    };

    run_web_server(listener, store, shutdown_signal).await?;

    log!("Server shut down gracefully");

    Ok(())
}
