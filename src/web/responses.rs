use axum::http::StatusCode;

use crate::api::ApiError;

/// Status for a page that reports a failed backend call inline.
///
/// Client errors from the backend are passed through; anything else is a bad gateway.
pub fn upstream_status(err: &ApiError) -> StatusCode {
    err.status()
        .and_then(|status| StatusCode::from_u16(status.as_u16()).ok())
        .filter(StatusCode::is_client_error)
        .unwrap_or(StatusCode::BAD_GATEWAY)
}
