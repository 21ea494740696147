use super::cookies::extract_token_from_request;
use super::session::SessionTokens;
use crate::errors::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

/// The caller of the current request.
///
/// `is_admin` only ever comes from the stored user row, never from request input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    pub email: Option<String>,
    pub is_admin: bool,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(email: impl Into<String>, is_admin: bool) -> Self {
        Self {
            email: Some(email.into()),
            is_admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.email.is_some()
    }

    /// 401 for anonymous callers, 403 for signed-in non-admins.
    pub fn require_admin(&self) -> Result<&str, AppError> {
        match (&self.email, self.is_admin) {
            (None, _) => Err(AppError::Unauthorized("Authentication required".to_string())),
            (Some(_), false) => Err(AppError::Forbidden("Admin access required".to_string())),
            (Some(email), true) => Ok(email),
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Viewer>().cloned().unwrap_or_default())
    }
}

/// Maps a verified session email to the stored user.
///
/// `Ok(None)` means the user is unknown or no longer allowed to sign in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewerResolver: Send + Sync {
    async fn resolve(&self, email: &str) -> Result<Option<Viewer>, AppError>;
}

#[derive(Clone)]
pub struct ViewerState {
    tokens: SessionTokens,
    resolver: Arc<dyn ViewerResolver>,
}

impl ViewerState {
    pub fn new(tokens: SessionTokens, resolver: Arc<dyn ViewerResolver>) -> Self {
        Self { tokens, resolver }
    }

    pub async fn resolve_headers(&self, headers: &HeaderMap) -> Viewer {
        let Some(token) = extract_token_from_request(headers) else {
            return Viewer::anonymous();
        };

        let claims = match self.tokens.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                return Viewer::anonymous();
            }
        };

        match self.resolver.resolve(&claims.email).await {
            Ok(Some(viewer)) => viewer,
            Ok(None) => {
                tracing::debug!(email = %claims.email, "Session user unknown or deleted");
                Viewer::anonymous()
            }
            Err(e) => {
                tracing::warn!(email = %claims.email, "Viewer lookup failed, continuing anonymously: {}", e);
                Viewer::anonymous()
            }
        }
    }
}

/// Inserts a [`Viewer`] into every request. Never rejects.
pub async fn viewer_middleware(
    State(state): State<ViewerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = state.resolve_headers(request.headers()).await;
    request.extensions_mut().insert(viewer);
    next.run(request).await
}
