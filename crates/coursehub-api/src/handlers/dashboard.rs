//! Dashboard analytics handlers.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use coursehub_core::types::{CountResult, ResponseEnvelope};
use coursehub_entity::dashboard::DynamicAggregationRequest;
use coursehub_entity::search::AdvancedSearchRequest;

use crate::error::ApiError;
use crate::extractors::{JsonBody, Requester};
use crate::state::AppState;

/// POST /api/dashboards/query
pub async fn query(
    State(state): State<AppState>,
    requester: Requester,
    JsonBody(request): JsonBody<AdvancedSearchRequest>,
) -> Result<Json<ResponseEnvelope<CountResult>>, ApiError> {
    Ok(Json(state.dashboard_service.query(&requester, request).await?))
}

/// POST /api/dashboards/dynamic-aggregation
pub async fn dynamic_aggregation(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DynamicAggregationRequest>,
) -> Result<Json<ResponseEnvelope<Vec<Value>>>, ApiError> {
    Ok(Json(
        state.dashboard_service.dynamic_aggregation(request).await?,
    ))
}
