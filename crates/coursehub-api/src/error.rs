//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use coursehub_core::error::{AppError, ErrorKind, ExternalFailure};

/// Message returned for every failure whose detail stays server-side.
pub const GENERIC_MESSAGE: &str = "Internal server error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub status_code: u16,
    /// RFC 3339 time the error was produced.
    pub timestamp: String,
    pub message: String,
}

/// Failure details attached to error responses for the error-log
/// middleware.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub status: StatusCode,
    pub kind: ErrorKind,
    /// Full message including the underlying cause.
    pub detail: String,
}

/// An `AppError` leaving a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::InvalidArgument | ErrorKind::UnsupportedOperator => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ExternalService(ExternalFailure::Response { .. }) => StatusCode::BAD_GATEWAY,
        ErrorKind::ExternalService(ExternalFailure::NoResponse) => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::ExternalService(ExternalFailure::Request)
        | ErrorKind::Persistence
        | ErrorKind::Serialization
        | ErrorKind::Configuration
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);
        let detail = match &err.source {
            Some(source) => format!("{err} ({source})"),
            None => err.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %detail, "Request failed");
        } else {
            tracing::debug!(kind = %err.kind, error = %detail, "Request rejected");
        }

        let message = if err.is_caller_facing() {
            err.message.clone()
        } else {
            GENERIC_MESSAGE.to_string()
        };
        let body = ApiErrorResponse {
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorRecord {
            status,
            kind: err.kind,
            detail,
        });
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::UnsupportedOperator), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::ExternalService(ExternalFailure::Response { status: 503 })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(ErrorKind::ExternalService(ExternalFailure::NoResponse)),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(ErrorKind::Persistence),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_persistence_detail_is_hidden() {
        let response = ApiError(AppError::persistence("connection reset by peer")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let record = response.extensions().get::<ErrorRecord>().unwrap();
        assert!(record.detail.contains("connection reset"));
    }
}
