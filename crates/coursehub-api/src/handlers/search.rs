//! Advanced search handler.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use coursehub_core::types::ResponseEnvelope;
use coursehub_entity::search::AdvancedSearchRequest;

use crate::error::ApiError;
use crate::extractors::{JsonBody, PaginationParams, Requester};
use crate::state::AppState;

/// POST /api/search?page=&offset=
pub async fn search(
    State(state): State<AppState>,
    requester: Requester,
    pagination: PaginationParams,
    JsonBody(request): JsonBody<AdvancedSearchRequest>,
) -> Result<Json<ResponseEnvelope<Vec<Value>>>, ApiError> {
    let envelope = state
        .search_service
        .search(&requester, request, pagination.into_page_request())
        .await?;
    Ok(Json(envelope))
}
