//! Reminder upsert handler.

use axum::Json;
use axum::extract::State;

use coursehub_core::types::ResponseEnvelope;
use coursehub_entity::reminder::{Reminder, UpsertReminder};

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /api/reminders/upsert
pub async fn upsert(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UpsertReminder>,
) -> Result<Json<ResponseEnvelope<Reminder>>, ApiError> {
    Ok(Json(state.reminder_service.upsert(input).await?))
}
