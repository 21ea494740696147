use super::session::SESSION_COOKIE;
use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};

/// `HttpOnly; SameSite=Lax; Path=/` cookie with an explicit `Max-Age`.
pub fn session_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure_flag = if secure { " Secure;" } else { "" };
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={}",
        name, value, secure_flag, max_age_secs
    ))
}

/// Expires `name` immediately.
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    session_cookie(name, "", 0, secure)
}

pub fn extract_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// `Authorization: Bearer <token>` wins over the session cookie.
pub fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| extract_cookie_value(headers, SESSION_COOKIE))
}
