//! Liveness endpoint for the hosting platform's health check.

use anyhow::{Context, Result};
use axum::{Router, routing::get};

async fn root() -> &'static str {
    "Bot is Running!"
}

/// Serves `GET /` with a fixed 200 response until the process exits.
pub async fn serve(port: u16) -> Result<()> {
    let app = Router::new().route("/", get(root));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind keep-alive port {}", port))?;
    log::info!("Keep-alive server listening on port {}", port);
    axum::serve(listener, app)
        .await
        .context("Keep-alive server exited")?;
    Ok(())
}
