//! Availability HTTP Server Binary
//!
//! Serves the availability endpoints over an in-memory or remote repository.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin availability-server --features "local-repo,http-server"
//!
//! # Proxy to the hosted availability service
//! REPOSITORY_TYPE=remote AVAILABILITY_API_URL=https://api.example.com \
//!   cargo run --bin availability-server --features "remote-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `remote`
//! - `AVAILABILITY_API_URL`, `AVAILABILITY_API_TOKEN`: remote service settings
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use availability_engine::config::EngineConfig;
use availability_engine::db;
use availability_engine::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting availability HTTP server");

    let config = match EngineConfig::default_location() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EngineConfig::from_file(&path)?.with_env_overrides()
        }
        None => {
            warn!("No availability.toml found, using defaults");
            EngineConfig::default().with_env_overrides()
        }
    };

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!(
        "Repository initialized (overlap policy: {:?})",
        config.overlap_policy()
    );

    let app = create_router(AppState::from_config(repository, &config));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
