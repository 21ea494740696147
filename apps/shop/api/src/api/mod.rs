//! API routes module

pub mod auth;
pub mod health;
pub mod products;

use std::sync::Arc;

use axum::{Router, middleware};
use axum_helpers::{ViewerState, viewer_middleware};
use domain_users::{PgUserRepository, UserViewerResolver};

use crate::state::AppState;

/// Routes without the `/api` prefix; `create_router` adds it.
///
/// Every route sees a `Viewer` resolved from the session cookie.
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    let resolver = UserViewerResolver::new(PgUserRepository::new(state.db.clone()));
    let viewer_state = ViewerState::new(state.tokens.clone(), Arc::new(resolver));

    let router = Router::new()
        .nest("/products", products::router(state))
        .nest("/auth", auth::router(state)?)
        .layer(middleware::from_fn_with_state(viewer_state, viewer_middleware));

    Ok(router)
}

/// `/ready` with live Postgres and Redis probes
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
