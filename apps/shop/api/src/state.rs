//! Application state shared by the route builders

use std::sync::Arc;

use axum_helpers::SessionTokens;
use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;
use domain_products::FileStorage;

/// Built once in `main`; route builders clone what they need.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL pool for the catalog and users
    pub db: DatabaseConnection,
    /// Pending OAuth logins
    pub redis: ConnectionManager,
    pub storage: Arc<dyn FileStorage>,
    pub tokens: SessionTokens,
}
