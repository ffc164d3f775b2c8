//! # Vendora Store API
//!
//! REST server for the order core: order placement with inventory
//! reservation and delivery estimates, plus the read-only order views.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store API Server                                 │
//! │                                                                         │
//! │  Clients ───► HTTP/JSON (8080) ───► axum handlers ───► SQLite          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                          ONE transaction per order creation             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;

use tracing::info;

use crate::config::StoreConfig;
use crate::state::AppState;
use vendora_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real deployments set the environment directly
    dotenvy::dotenv().ok();

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vendora_store_api=info,vendora_db=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting Vendora store API server...");

    // Load configuration
    let config = StoreConfig::load()?;
    info!(
        port = config.http_port,
        database_path = %config.database_path,
        "Configuration loaded"
    );

    // Connect to the database (runs migrations on startup)
    let db = Database::new(
        DbConfig::new(&config.database_path)
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections),
    )
    .await?;
    info!("Database ready");

    // Build the router with shared state
    let state = AppState::new(db.clone());
    let app = routes::router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
