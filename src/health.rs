//! Liveness endpoint so the hosting platform keeps the process warm.
//! Serves regardless of session state.

use axum::routing::get;
use axum::Router;
use tracing::info;

pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    "Bot alive!"
}

/// Bind and serve the liveness route. Runs until the listener fails.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("🌐 Liveness endpoint listening on port {port}");
    axum::serve(listener, router()).await
}
