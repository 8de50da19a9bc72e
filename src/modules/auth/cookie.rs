use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::CookieJar;

use crate::types::AppEnvironment;

pub const SESSION_COOKIE_NAME: &str = "session_token";
pub const SESSION_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 30;

fn build(value: &str, max_age: i64, environment: &AppEnvironment) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if let AppEnvironment::Production = environment {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn session_cookie(
    token: &str,
    environment: &AppEnvironment,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&build(token, SESSION_MAX_AGE_SECONDS, environment))
}

pub fn clear_session_cookie(
    environment: &AppEnvironment,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&build("", 0, environment))
}

/// Empty values count as no cookie at all.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
