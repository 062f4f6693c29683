//! Caller identity from the `x-user-id` header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use coursehub_service::RequestContext;

/// Header naming the acting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Request context for the caller; anonymous when the header is absent.
#[derive(Debug, Clone)]
pub struct Requester(pub RequestContext);

impl std::ops::Deref for Requester {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Requester {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let requester = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Ok(Self(RequestContext::new(requester)))
    }
}
