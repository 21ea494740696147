pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;

/// Body of every error response.
///
/// ```json
/// { "code": 1004, "error": "NOT_FOUND", "message": "Product not found" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP-facing error. Domain crates convert their own errors into this type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Persisted data breaks an invariant. Logged in full, reported as a generic 500.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            AppError::Database(e) => map_db_error(&e),
            AppError::UuidError(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUuid.code(), "UUID error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    ErrorCode::InvalidUuid,
                )
            }
            AppError::Multipart(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidMultipart.code(),
                    "Multipart error: {:?}",
                    e
                );
                (e.status(), e.body_text(), ErrorCode::InvalidMultipart)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, ErrorCode::ValidationError)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, msg, ErrorCode::Unauthorized)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg, ErrorCode::Forbidden)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, ErrorCode::NotFound)
            }
            AppError::DataIntegrity(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DataIntegrity.code(),
                    "Data integrity violation: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DataIntegrity.default_message().to_string(),
                    ErrorCode::DataIntegrity,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!(error_code = ErrorCode::StorageError.code(), "Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageError.default_message().to_string(),
                    ErrorCode::StorageError,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError.default_message().to_string(),
                    ErrorCode::InternalError,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg, ErrorCode::ServiceUnavailable)
            }
        };

        error_response(status, message, code)
    }
}

fn map_db_error(error: &DbErr) -> (StatusCode, String, ErrorCode) {
    let code = match error {
        DbErr::RecordNotFound(_) => {
            tracing::info!(error_code = ErrorCode::DatabaseNotFound.code(), "Database row not found: {}", error);
            return (
                StatusCode::NOT_FOUND,
                ErrorCode::DatabaseNotFound.default_message().to_string(),
                ErrorCode::DatabaseNotFound,
            );
        }
        DbErr::ConnectionAcquire(_) => ErrorCode::DatabasePoolTimeout,
        DbErr::Conn(_) => ErrorCode::DatabaseConnection,
        _ => ErrorCode::DatabaseError,
    };

    tracing::error!(error_code = code.code(), "Database error: {:?}", error);
    let status = match code {
        ErrorCode::DatabasePoolTimeout | ErrorCode::DatabaseConnection => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, code.default_message().to_string(), code)
}

/// Builds an error response without going through `AppError`.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
