//! # Kasir API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tracing → ApiConfig::load → Database::new (migrations)                │
//! │        → TcpListener::bind → axum::serve ── Ctrl+C / SIGTERM ──► close │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_api::{build_app, ApiConfig, AppState};
use kasir_db::Database;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so its log level can seed the filter
    let config = ApiConfig::load();

    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    info!("Starting Kasir API server...");
    info!(
        addr = %config.bind_address(),
        database = %config.database_path,
        stock_policy = %config.stock_policy,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()?).await?;
    info!("Database ready");

    let addr = config.bind_address();
    let app = build_app(AppState::new(db.clone(), config));

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

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
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
