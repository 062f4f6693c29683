//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use coursehub_core::types::{Payload, ResponseEnvelope};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
}

impl Payload for HealthResponse {}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ResponseEnvelope<HealthResponse>> {
    let reachable = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };
    let (status, storage) = if reachable {
        ("ok", "connected")
    } else {
        ("degraded", "unavailable")
    };
    Json(ResponseEnvelope::wrap(
        reachable,
        Some(format!("Service is {status}")),
        HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            storage,
        },
    ))
}
