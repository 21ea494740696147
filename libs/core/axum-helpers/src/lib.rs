//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`auth`]**: session tokens, cookies and the per-request [`Viewer`]
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the JSON error body
//! - **[`extractors`]**: `UuidPath`
//! - **[`audit`]**: audit trail on the `audit` target

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    REFRESH_COOKIE, REFRESH_TOKEN_TTL, SESSION_COOKIE, SessionClaims, SessionConfig,
    SessionTokens, Viewer, ViewerResolver, ViewerState, viewer_middleware,
};

pub use server::{
    CleanupCoordinator, HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres,
    close_redis, create_production_app, create_router, health_router, run_health_checks,
    shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::UuidPath;

pub use audit::{AuditEvent, AuditOutcome, ClientInfo, extract_ip_from_headers, extract_user_agent};
