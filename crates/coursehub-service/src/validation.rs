//! Input validation at the service boundary.

use validator::Validate;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;

/// Validate `input`, mapping failures to a `Validation` error.
pub fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(|errors| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Validation failed: {errors}"),
            errors,
        )
    })
}
