/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task CRUD endpoints for the authenticated caller

pub mod auth;
pub mod health;
pub mod tasks;

use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use validator::Validate;

/// Runs derive-based validation plus not-blank checks
///
/// `required` lists `(field, value)` pairs that must contain something other
/// than whitespace. All failures are reported together.
pub(crate) fn validate_request<T: Validate>(
    request: &T,
    required: &[(&str, &str)],
) -> ApiResult<()> {
    let mut details = match request.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => match ApiError::from(errors) {
            ApiError::ValidationError(details) => details,
            other => return Err(other),
        },
    };

    for (field, value) in required {
        if value.trim().is_empty() && !details.iter().any(|d| d.field == *field) {
            details.push(ValidationErrorDetail::new(*field, format!("{} must not be blank", field)));
        }
    }

    if details.is_empty() {
        Ok(())
    } else {
        details.sort_by(|a, b| a.field.cmp(&b.field));
        Err(ApiError::ValidationError(details))
    }
}
