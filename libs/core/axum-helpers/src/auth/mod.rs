//! Session tokens and request viewer resolution.
//!
//! A login issues an HS512 session token that travels in the `jwt` cookie (or a
//! `Bearer` header). `viewer_middleware` turns that token into a [`Viewer`] on
//! every request; handlers read it with the `Viewer` extractor.
//!
//! ```ignore
//! let tokens = SessionTokens::new(&SessionConfig::from_env()?);
//! let api = api_routes.layer(axum::middleware::from_fn_with_state(
//!     ViewerState::new(tokens, Arc::new(resolver)),
//!     viewer_middleware,
//! ));
//! ```

pub mod config;
pub mod cookies;
pub mod session;
pub mod viewer;

pub use config::SessionConfig;
pub use cookies::{clear_cookie, extract_cookie_value, extract_token_from_request, session_cookie};
pub use session::{REFRESH_COOKIE, REFRESH_TOKEN_TTL, SESSION_COOKIE, SessionClaims, SessionTokens};
pub use viewer::{Viewer, ViewerResolver, ViewerState, viewer_middleware};
