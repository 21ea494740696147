//! Google sign-in routes

use std::sync::Arc;

use axum::Router;
use domain_users::{AuthService, GoogleOAuth, PgUserRepository, RedisPendingLoginStore, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> eyre::Result<Router> {
    let google = GoogleOAuth::new(&state.config.google)?;
    let service = AuthService::new(
        PgUserRepository::new(state.db.clone()),
        Arc::new(RedisPendingLoginStore::new(state.redis.clone())),
        Arc::new(google),
        state.tokens.clone(),
        state.config.google.clone(),
    );

    Ok(handlers::router(service))
}
