//! Captcha verification handler.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use coursehub_core::types::ResponseEnvelope;
use coursehub_service::CaptchaOutcome;

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyCaptchaRequest {
    #[serde(default)]
    pub token: String,
}

/// POST /api/captcha/verify
pub async fn verify(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VerifyCaptchaRequest>,
) -> Result<Json<ResponseEnvelope<CaptchaOutcome>>, ApiError> {
    Ok(Json(state.captcha.verify(&request.token).await?))
}
