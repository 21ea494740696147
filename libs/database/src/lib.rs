//! Connection management for the stores the shop backend talks to.
//!
//! # Features
//!
//! - `postgres` (default): catalog and user store through SeaORM
//! - `redis` (default): short-lived OAuth login state
//! - `config`: `core_config::FromEnv` implementations for the configs
//!
//! ```ignore
//! let db = database::postgres::connect_from_config_with_retry(config.database, None).await?;
//! database::postgres::run_migrations::<migration::Migrator>(&db, "shop_api").await?;
//! let redis = database::redis::connect_from_config_with_retry(config.redis, None).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult};
