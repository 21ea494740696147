use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The stored product graph is inconsistent, e.g. the featured photo
    /// does not belong to any of the product's variants.
    #[error("Product {product_id} has unresolvable featured photo {featured_photo_id:?}")]
    DataIntegrity {
        product_id: Uuid,
        featured_photo_id: Option<Uuid>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            e @ ProductError::DataIntegrity { .. } => AppError::DataIntegrity(e.to_string()),
            ProductError::Storage(StorageError::InvalidImage(msg)) => {
                AppError::BadRequest(format!("Invalid image: {}", msg))
            }
            ProductError::Storage(e) => AppError::Storage(e.to_string()),
            ProductError::Database(msg) => AppError::InternalServerError(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
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
            (ProductError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (ProductError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ProductError::DataIntegrity {
                    product_id: Uuid::nil(),
                    featured_photo_id: None,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ProductError::Storage(StorageError::InvalidImage("truncated".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProductError::Storage(StorageError::Upload("timeout".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ProductError::Database("gone".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
