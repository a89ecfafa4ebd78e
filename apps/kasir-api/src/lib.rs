//! # Kasir API
//!
//! HTTP server for the cashier backend: product catalog, checkout and sales
//! reports over JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kasir API Routes                                │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  products      │  │  checkout      │  │  report                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • list / get   │  │ • POST         │  │ • today                    ││
//! │  │ • create       │  │   /api/checkout│  │ • start_date..end_date     ││
//! │  │ • update/delete│  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │           │                  │                        │                 │
//! │           └──────────────────┼────────────────────────┘                 │
//! │                              ▼                                          │
//! │                 AppState { db: kasir_db::Database, config }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or `kasir.toml`):
//! - `KASIR_HOST` / `KASIR_PORT` - bind address (default: 0.0.0.0:8080)
//! - `KASIR_DATABASE_PATH` - SQLite file (default: kasir.db)
//! - `KASIR_MAX_CONNECTIONS` - pool size (default: 5)
//! - `KASIR_CHECKOUT_TIMEOUT_SECS` - checkout deadline (default: 10)
//! - `KASIR_STOCK_POLICY` - `allow_negative` (default) or `require_available`
//! - `KASIR_LOG_LEVEL` - default log filter (default: info)

use std::sync::Arc;

use axum::http::Uri;
use axum::Router;
use kasir_db::Database;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

// Re-exports
pub use crate::config::{ApiConfig, ConfigError};
pub use crate::error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the router with every route and the request trace layer.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::products::router())
        .merge(routes::checkout::router())
        .merge(routes::report::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found("Route", uri.path())
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{send, test_app};
    use axum::http::StatusCode;
    use kasir_core::StockPolicy;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_route_returns_json_not_found() {
        let (app, _db) = test_app(StockPolicy::AllowNegative).await;

        for uri in ["/api/products/", "/api/nothing"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(
                body,
                json!({"code": "NOT_FOUND", "message": format!("Route not found: {uri}")})
            );
        }
    }
}
