//! Mock AgentDesk backend binary.
//!
//! Listens on `MOCK_BACKEND_PORT` (default `8000`, the port the client falls
//! back to in production mode).

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("MOCK_BACKEND_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(address = %addr, prefix = mock_backend::PROXY_PREFIX, "mock backend listening");
    axum::serve(listener, mock_backend::app())
        .await
        .context("server error")?;
    Ok(())
}
