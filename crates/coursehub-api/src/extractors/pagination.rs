//! Pagination query parameter extractor.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use coursehub_core::error::AppError;
use coursehub_core::types::PageRequest;
use coursehub_core::types::pagination::DEFAULT_PAGE_SIZE;

use crate::error::ApiError;

/// Query parameters for paginated endpoints: `?page=&offset=`.
///
/// `offset` is the page size; `pageSize` is accepted as an alias. Bounds
/// are enforced when the window is computed, so `page=0` yields an
/// invalid-argument error rather than being clamped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 10).
    #[serde(default = "default_offset", alias = "pageSize")]
    pub offset: u64,
}

fn default_page() -> u64 {
    1
}

fn default_offset() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.offset)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PaginationParams {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<Self>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| params)
            .map_err(|rejection| {
                AppError::invalid_argument(format!(
                    "Invalid pagination parameters: {}",
                    rejection.body_text()
                ))
                .into()
            })
    }
}
