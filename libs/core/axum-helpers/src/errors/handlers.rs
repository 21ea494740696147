use axum::response::Response;

use super::{ErrorCode, error_response};
use axum::http::StatusCode;

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource was not found".to_string(),
        ErrorCode::NotFound,
    )
}
