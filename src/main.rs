use std::sync::Arc;

use teloxide::Bot;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use lensbot::config::Config;
use lensbot::creds::CredentialStore;
use lensbot::describe::Describer;
use lensbot::health;
use lensbot::relay::MediaRelay;
use lensbot::session::SessionManager;
use lensbot::telegram::TelegramTransport;
use lensbot::transport::Transport;

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "lensbot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("lensbot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting lensbot...");
    info!("Loaded config from {config_path}");

    let port = config.port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            warn!("liveness server error: {e}");
        }
    });

    let transport: Arc<dyn Transport> =
        Arc::new(TelegramTransport::new(Bot::new(&config.telegram_bot_token)));
    let manager = SessionManager::new(
        transport,
        CredentialStore::new(&config.auth_dir),
        MediaRelay::new(config.upload_url),
        Describer::new(config.worker_url),
    );

    manager.run().await;
}
