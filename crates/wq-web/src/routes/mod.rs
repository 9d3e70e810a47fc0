//! Route handlers.

pub mod network;
pub mod status;

use axum::http::StatusCode;

/// Handler error: status plus plain-text body.
pub type ApiError = (StatusCode, String);

pub(crate) fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %format!("{:#}", err), "Request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
}

pub(crate) fn check_range(name: &str, value: usize, min: usize, max: usize) -> Result<usize, ApiError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            format!("{} must be between {} and {}, got {}", name, min, max, value),
        ))
    }
}
