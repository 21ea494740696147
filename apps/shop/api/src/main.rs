//! Shop API - product catalog and Google sign-in over REST

use axum_helpers::SessionTokens;
use axum_helpers::server::{close_postgres, close_redis, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::StorageConfig;
use domain_products::storage::build_storage;
use migration::Migrator;
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(config.database.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_from_config_with_retry(config.redis.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;

    let storage = build_storage(&config.storage).await;
    let tokens = SessionTokens::new(&config.session);

    let state = AppState {
        config,
        db,
        redis,
        storage,
        tokens,
    };

    let api_routes = api::routes(&state)?;
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    let mut app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    // Local storage hands out URLs under /uploads, so this process serves them
    if let StorageConfig::Local(local) = &state.config.storage {
        info!("Serving uploads from {}", local.root.display());
        app = app.nest_service("/uploads", ServeDir::new(&local.root));
    }

    info!("Starting shop API with graceful shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            tokio::join!(
                close_postgres(state.db, "shop"),
                close_redis(state.redis, "oauth")
            );
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shop API shutdown complete");
    Ok(())
}
