//! Typed path parameter helpers.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use coursehub_core::error::AppError;
use coursehub_core::types::EntityId;

use crate::error::ApiError;

/// The `{id}` path segment parsed as an [`EntityId`].
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub EntityId);

impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(EntityId::parse(&raw)?))
    }
}
