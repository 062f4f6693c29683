//! Unified application error types for CourseHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Classification into HTTP status
//! codes happens once, at the API boundary.

use std::fmt;
use thiserror::Error;

/// How an outbound call to an external service failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum ExternalFailure {
    /// The service answered, but with an error status.
    Response {
        /// HTTP status code returned by the service.
        status: u16,
    },
    /// No response arrived (connection refused, timeout, reset).
    NoResponse,
    /// The outbound request could not be built or sent.
    Request,
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed input caught before reaching storage.
    Validation,
    /// A caller-supplied argument is outside its domain (e.g. page 0).
    InvalidArgument,
    /// An advanced-search rule used an unrecognized comparator.
    UnsupportedOperator,
    /// The referenced identifier does not exist.
    NotFound,
    /// A storage call failed.
    Persistence,
    /// An outbound call to an external service failed.
    ExternalService(ExternalFailure),
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::UnsupportedOperator => write!(f, "UNSUPPORTED_OPERATOR"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Persistence => write!(f, "PERSISTENCE"),
            Self::ExternalService(ExternalFailure::Response { status }) => {
                write!(f, "EXTERNAL_SERVICE({status})")
            }
            Self::ExternalService(ExternalFailure::NoResponse) => {
                write!(f, "EXTERNAL_SERVICE(NO_RESPONSE)")
            }
            Self::ExternalService(ExternalFailure::Request) => {
                write!(f, "EXTERNAL_SERVICE(REQUEST)")
            }
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CourseHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create an unsupported-operator error.
    pub fn unsupported_operator(operator: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperator,
            format!("Unsupported operator: '{operator}'"),
        )
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Persistence, message)
    }

    /// Create an external-service error.
    pub fn external(failure: ExternalFailure, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService(failure), message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the message is safe to show to API callers.
    ///
    /// Storage, serialization, configuration, and internal failures
    /// collapse to a generic message at the boundary.
    pub fn is_caller_facing(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation
                | ErrorKind::InvalidArgument
                | ErrorKind::UnsupportedOperator
                | ErrorKind::NotFound
                | ErrorKind::ExternalService(ExternalFailure::Response { .. })
                | ErrorKind::ExternalService(ExternalFailure::NoResponse)
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::not_found("Course not found");
        assert_eq!(err.to_string(), "NOT_FOUND: Course not found");
    }

    #[test]
    fn test_unsupported_operator_message() {
        let err = AppError::unsupported_operator("~=");
        assert_eq!(err.kind, ErrorKind::UnsupportedOperator);
        assert!(err.message.contains("~="));
    }

    #[test]
    fn test_caller_facing_classification() {
        assert!(AppError::validation("bad").is_caller_facing());
        assert!(AppError::external(ExternalFailure::Response { status: 400 }, "x").is_caller_facing());
        assert!(!AppError::persistence("db down").is_caller_facing());
        assert!(!AppError::external(ExternalFailure::Request, "x").is_caller_facing());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::from(io);
        assert!(err.source.is_some());
        assert!(err.clone().source.is_none());
    }
}
