//! `/api/auth` routes: Google sign-in, session refresh, profile and logout

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, ClientInfo, REFRESH_COOKIE, REFRESH_TOKEN_TTL,
    SESSION_COOKIE, Viewer,
    auth::{clear_cookie, extract_cookie_value, session_cookie},
    errors::responses::{
        BadRequestValidationResponse, ForbiddenResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use crate::error::UserError;
use crate::models::{RefreshResponse, UserProfile};
use crate::repository::UserRepository;
use crate::service::AuthService;

#[derive(OpenApi)]
#[openapi(
    paths(login, callback, refresh_token, profile, logout),
    components(
        schemas(UserProfile, RefreshResponse),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Google sign-in and sessions")
    )
)]
pub struct ApiDoc;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// `admin` for the CMS, or a storefront path starting with `/`
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// Routes relative to the mount point (`/api/auth` in the API binary).
pub fn router<R: UserRepository + 'static>(service: AuthService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/login", get(login::<R>))
        .route("/callback", get(callback::<R>))
        .route("/refresh-token", post(refresh_token::<R>))
        .route("/profile", get(profile::<R>))
        .route("/logout", post(logout::<R>))
        .with_state(shared_service)
}

fn cookie_error(e: header::InvalidHeaderValue) -> AppError {
    AppError::InternalServerError(format!("Failed to build cookie: {}", e))
}

fn cleared_cookies(secure: bool) -> Result<[(header::HeaderName, HeaderValue); 2], AppError> {
    Ok([
        (header::SET_COOKIE, clear_cookie(SESSION_COOKIE, secure).map_err(cookie_error)?),
        (header::SET_COOKIE, clear_cookie(REFRESH_COOKIE, secure).map_err(cookie_error)?),
    ])
}

/// Start Google sign-in
#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    params(LoginQuery),
    responses(
        (status = 303, description = "Redirect to Google's consent screen"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    Query(query): Query<LoginQuery>,
) -> Result<Redirect, AppError> {
    let url = service.start_login(query.redirect_to).await?;
    Ok(Redirect::to(&url))
}

/// Google redirect target
///
/// Sets the session cookie (and the refresh cookie when Google issued a
/// refresh token), then redirects to the storefront or the CMS.
#[utoipa::path(
    get,
    path = "/callback",
    tag = "Auth",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Signed in, redirect with cookies set"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn callback<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let client = ClientInfo::from_headers(&headers);
    let success = service
        .complete_login(&query.code, &query.state, &client)
        .await?;

    let tokens = service.tokens();
    let secure = tokens.secure_cookies();
    let mut cookies = vec![(
        header::SET_COOKIE,
        session_cookie(SESSION_COOKIE, &success.session_token, tokens.ttl_secs(), secure)
            .map_err(cookie_error)?,
    )];
    if let Some(refresh_token) = &success.refresh_token {
        cookies.push((
            header::SET_COOKIE,
            session_cookie(REFRESH_COOKIE, refresh_token, REFRESH_TOKEN_TTL, secure)
                .map_err(cookie_error)?,
        ));
    }

    Ok((AppendHeaders(cookies), Redirect::to(&success.redirect_url)).into_response())
}

/// Renew the session from the Google refresh token cookie
#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = "Auth",
    responses(
        (status = 200, description = "New session cookie set", body = RefreshResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn refresh_token<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(refresh_token) = extract_cookie_value(&headers, REFRESH_COOKIE) else {
        return Err(AppError::Unauthorized("No refresh token".to_string()));
    };

    let tokens = service.tokens();
    let secure = tokens.secure_cookies();

    match service.refresh_session(&refresh_token).await {
        Ok(session_token) => {
            let cookie = session_cookie(SESSION_COOKIE, &session_token, tokens.ttl_secs(), secure)
                .map_err(cookie_error)?;
            Ok((
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Json(RefreshResponse::success()),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Session refresh failed: {}", e);
            let unauthorized = AppError::Unauthorized("Session refresh failed".to_string());
            Ok((AppendHeaders(cleared_cookies(secure)?), unauthorized).into_response())
        }
    }
}

/// The signed-in user
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn profile<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    viewer: Viewer,
) -> Result<Json<UserProfile>, AppError> {
    let Some(email) = viewer.email.as_deref() else {
        return Err(UserError::Unauthorized("Authentication required".to_string()).into());
    };

    let user = service.profile(email).await?;
    Ok(Json(user.into()))
}

/// Sign out and return to the storefront
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 303, description = "Cookies cleared, redirect to the storefront")
    )
)]
async fn logout<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    viewer: Viewer,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    AuditEvent::new(viewer.email.clone(), "auth.logout", None, AuditOutcome::Success)
        .with_client(&ClientInfo::from_headers(&headers))
        .log();

    let secure = service.tokens().secure_cookies();
    Ok((
        AppendHeaders(cleared_cookies(secure)?),
        Redirect::to(service.frontend_url()),
    )
        .into_response())
}
