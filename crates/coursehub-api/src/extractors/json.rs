//! JSON body extractor reporting rejections as validation errors.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use coursehub_core::error::AppError;

use crate::error::ApiError;

/// Like `axum::Json`, but a malformed or mistyped body produces the
/// uniform error response.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))
            .into()),
        }
    }
}
