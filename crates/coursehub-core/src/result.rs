//! Convenience result type alias for CourseHub.

use crate::error::AppError;

/// A specialized `Result` type for CourseHub operations.
pub type AppResult<T> = Result<T, AppError>;
