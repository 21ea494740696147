use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    /// Login state unknown, expired or already used
    #[error("Invalid or expired login state")]
    InvalidLoginState,

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Account {0} is disabled")]
    Deleted(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for UserError {
    fn from(err: redis::RedisError) -> Self {
        UserError::Cache(err.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(email) => AppError::NotFound(format!("User {} not found", email)),
            e @ UserError::InvalidLoginState => AppError::BadRequest(e.to_string()),
            UserError::OAuth(msg) => {
                tracing::warn!("OAuth failure: {}", msg);
                AppError::Unauthorized("Google sign-in failed".to_string())
            }
            UserError::Unauthorized(msg) => AppError::Unauthorized(msg),
            e @ UserError::Deleted(_) => AppError::Forbidden(e.to_string()),
            UserError::Database(msg) | UserError::Cache(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UserError::InvalidLoginState, StatusCode::BAD_REQUEST),
            (UserError::OAuth("bad code".into()), StatusCode::UNAUTHORIZED),
            (UserError::Unauthorized("no session".into()), StatusCode::UNAUTHORIZED),
            (UserError::Deleted("a@b.c".into()), StatusCode::FORBIDDEN),
            (UserError::NotFound("a@b.c".into()), StatusCode::NOT_FOUND),
            (UserError::Cache("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
