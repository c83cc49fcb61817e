//! Binary entrypoint for the docvault HTTP server.
//!
//! Configuration comes from environment variables; see [`ServerConfig`].

use docvault_server::config::ServerConfig;
use docvault_server::router::build_router;
use docvault_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    if config.assistant.is_none() {
        tracing::warn!("no GEMINI_API_KEY set; assistant routes are disabled");
    }

    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(data_dir = %config.data_dir.display(), "docvault server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
