//! Users Domain
//!
//! Google sign-in and session handling for shop accounts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /api/auth endpoints, cookies
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────────┐
//! │ AuthService │ ──▶ │ IdentityProvider │  ← Google (oauth2 + reqwest)
//! └──────┬──────┘     └──────────────────┘
//!        │            ┌──────────────────┐
//!        ├──────────▶ │ PendingLoginStore│  ← Redis, state → PKCE verifier
//!        │            └──────────────────┘
//! ┌──────▼──────┐
//! │ Repository  │  ← users table (trait + implementations)
//! └─────────────┘
//! ```
//!
//! `UserViewerResolver` plugs the repository into the viewer middleware so
//! every request learns who is calling and whether they are an admin.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{
//!     AuthService, GoogleOAuth, GoogleOAuthConfig, InMemoryPendingLoginStore,
//!     InMemoryUserRepository, handlers,
//! };
//! use axum_helpers::{SessionConfig, SessionTokens};
//! use core_config::FromEnv;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GoogleOAuthConfig::from_env()?;
//! let tokens = SessionTokens::new(&SessionConfig::from_env()?);
//! let service = AuthService::new(
//!     InMemoryUserRepository::new(),
//!     Arc::new(InMemoryPendingLoginStore::new()),
//!     Arc::new(GoogleOAuth::new(&config)?),
//!     tokens,
//!     config,
//! );
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod google;
pub mod handlers;
pub mod models;
pub mod pending;
pub mod postgres;
pub mod repository;
pub mod resolver;
pub mod service;

// Re-export commonly used types
pub use config::GoogleOAuthConfig;
pub use error::{UserError, UserResult};
pub use google::{GoogleOAuth, IdentityProvider};
pub use models::{User, UserProfile};
pub use pending::{InMemoryPendingLoginStore, PendingLoginStore, RedisPendingLoginStore};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use resolver::UserViewerResolver;
pub use service::{AuthService, LoginSuccess};
