//! Per-request access log.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use coursehub_service::context::ANONYMOUS;

use crate::extractors::requester::USER_ID_HEADER;

/// Logs method, path, requester, status and duration of every request.
/// Server errors are logged at WARN.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let requester = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(ANONYMOUS)
        .to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        warn!(%method, %path, %requester, status, duration_ms, "HTTP request failed");
    } else {
        info!(%method, %path, %requester, status, duration_ms, "HTTP request");
    }

    response
}
