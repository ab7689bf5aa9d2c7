use anyhow::{Context, Result};
use axum::{
    http::Method,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::db::{create_pool, run_migrations};

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

/// Scheduler HTTP server instance
///
/// Owns the database pool for the lifetime of the process: it is opened in
/// [`SchedulerServer::run`] and closed after the listener shuts down.
pub struct SchedulerServer {
    config: ServerConfig,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

impl SchedulerServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Run the server until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let db_pool = create_pool(&self.config.db_path)
            .await
            .with_context(|| format!("Failed to open database {}", self.config.db_path.display()))?;
        run_migrations(&db_pool)
            .await
            .context("Failed to prepare database schema")?;

        if !self.config.web_dir.is_dir() {
            tracing::warn!(
                "Web directory {} does not exist, only the API will be served",
                self.config.web_dir.display()
            );
        }

        let state = AppState {
            db_pool: db_pool.clone(),
        };
        let app = create_router(state, &self.config.web_dir);

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .with_context(|| format!("Failed to bind to {}", self.config.addr))?;

        tracing::info!("Scheduler listening on {}", self.config.addr);
        tracing::info!("Database: {}", self.config.db_path.display());
        tracing::info!("Web directory: {}", self.config.web_dir.display());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        db_pool.close().await;
        tracing::info!("Scheduler stopped");

        Ok(())
    }
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, web_dir: &Path) -> Router {
    use super::routes;

    let api_routes = Router::new()
        .route("/health", get(health_handler))
        .merge(routes::api_routes());

    Router::new()
        // API routes under /api prefix
        .nest("/api", api_routes)
        // Everything else comes from the web directory
        .fallback_service(ServeDir::new(web_dir))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "todo-scheduler".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
