//! Product catalog routes

use axum::{Router, extract::DefaultBodyLimit};
use domain_products::{PgProductRepository, ProductService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = ProductService::new(repository, state.storage.clone());

    handlers::router(service).layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
}
