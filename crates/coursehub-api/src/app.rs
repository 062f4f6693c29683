//! Application builder: wires state and router into an Axum app and
//! serves it.

use std::sync::Arc;

use axum::Router;

use coursehub_core::config::AppConfig;
use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::traits::DocumentStore;
use coursehub_database::StoreManager;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the CourseHub server until Ctrl-C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting CourseHub server...");

    let store = StoreManager::new(&config).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store.store())?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
        })?;
    tracing::info!(%addr, "CourseHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    tracing::info!("CourseHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Builds the application over an already-constructed store.
pub fn app_with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> AppResult<Router> {
    Ok(build_app(AppState::new(config, store)?))
}
