//! Configuration for the shop API

use axum_helpers::SessionConfig;
use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use domain_products::StorageConfig;
use domain_users::GoogleOAuthConfig;

pub use core_config::Environment;

/// 50 MiB, enough for a handful of photos plus a digital asset
const DEFAULT_MAX_UPLOAD_BYTES: &str = "52428800";

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub session: SessionConfig,
    pub google: GoogleOAuthConfig,
    pub storage: StorageConfig,
    /// Request body limit for product creation
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let redis = RedisConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let session = SessionConfig::from_env()?;
        let google = GoogleOAuthConfig::from_env()?;
        let storage = StorageConfig::from_env()?;
        let max_upload_bytes = env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            app: app_info!(),
            database,
            redis,
            server,
            environment,
            session,
            google,
            storage,
            max_upload_bytes,
        })
    }
}
