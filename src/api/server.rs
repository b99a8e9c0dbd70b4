//! Budget Mapper API Server implementation
//!
//! HTTP REST API server using Axum. Operators (or a front-end) upload the
//! budget and template workbooks and get a preview or the mapped workbook.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::MappingConfig;
use crate::presenter::DEFAULT_PREVIEW_ROWS;

use super::handlers;

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Per-request upload limit, in megabytes
    pub max_upload_mb: usize,
    pub mapping: MappingConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_mb: 25,
            mapping: MappingConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Shared application state. Read-only; every request maps its own tables.
#[derive(Clone, Debug)]
pub struct AppState {
    pub version: String,
    pub mapping: MappingConfig,
    pub preview_rows: usize,
}

impl AppState {
    pub fn new(mapping: MappingConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            mapping,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Build the application router
pub fn build_router(config: &ApiConfig) -> Router {
    let state = Arc::new(AppState::new(config.mapping.clone()));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Mapping endpoints
        .route("/api/v1/preview", post(handlers::preview))
        .route("/api/v1/map", post(handlers::map))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    crate::logging::init_tracing("hotel_budget_mapper=info,budget_mapper_server=info,tower_http=info");

    let app = build_router(&config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🏨 Budget Mapper API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/preview, /api/v1/map");
    info!("   Health: /health, Version: /version");
    info!("   Upload limit: {} MB", config.max_upload_mb);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Budget Mapper API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
