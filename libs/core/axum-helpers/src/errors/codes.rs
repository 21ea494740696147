//! Stable error codes shared by every error response.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
//! assert_eq!(ErrorCode::ValidationError.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    InvalidUuid,
    InvalidMultipart,
    NotFound,
    Unauthorized,
    Forbidden,

    // Server errors (1000s)
    InternalError,
    ServiceUnavailable,
    /// Stored rows violate a catalog invariant
    DataIntegrity,

    // Database errors (2000-2999)
    DatabaseNotFound,
    DatabaseError,
    DatabaseConnection,
    DatabasePoolTimeout,

    // Storage errors (4000s)
    StorageError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidMultipart => "INVALID_MULTIPART",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DataIntegrity => "DATA_INTEGRITY",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseConnection => "DATABASE_CONNECTION",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1999: client and generic server errors
    /// - 2000-2999: database errors
    /// - 4000-4999: file storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::InvalidMultipart => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::ServiceUnavailable => 1011,
            Self::DataIntegrity => 1012,

            Self::DatabaseNotFound => 2001,
            Self::DatabaseError => 2003,
            Self::DatabaseConnection => 2004,
            Self::DatabasePoolTimeout => 2013,

            Self::StorageError => 4001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::InvalidMultipart => "Malformed multipart body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DataIntegrity => "An internal server error occurred",
            Self::DatabaseNotFound => "Database record not found",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseConnection => "Database is unreachable",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
            Self::StorageError => "File storage error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::DataIntegrity.as_str(), "DATA_INTEGRITY");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::NotFound.code(), 1004);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
        assert_eq!(ErrorCode::StorageError.code(), 4001);
    }

    #[test]
    fn test_data_integrity_message_does_not_leak_details() {
        assert_eq!(
            ErrorCode::DataIntegrity.default_message(),
            ErrorCode::InternalError.default_message()
        );
    }

    #[test]
    fn test_error_code_serde_matches_as_str() {
        let json = serde_json::to_string(&ErrorCode::InvalidMultipart).unwrap();
        assert_eq!(json, "\"INVALID_MULTIPART\"");
        let code: ErrorCode = serde_json::from_str("\"FORBIDDEN\"").unwrap();
        assert_eq!(code, ErrorCode::Forbidden);
    }
}
