//! Session endpoints and cookie handling.
//!
//! Sessions are stateless: the cookie carries a signed token and nothing is
//! stored server-side, so logout only clears the cookie.

use axum::{
    Json,
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, InvalidHeaderValue, SET_COOKIE},
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::{
    error::AuthError,
    state::{AuthConfig, AuthState},
    types::{ErrorResponse, LogoutResponse, UserResponse},
};

pub const SESSION_COOKIE_NAME: &str = "token";

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Session is active", body = UserResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn me(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<UserResponse>, AuthError> {
    let token = extract_session_token(&headers);
    let user = auth_state.service().who_am_i(token.as_deref()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = LogoutResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }
    (StatusCode::OK, headers, Json(LogoutResponse { ok: true }))
}

/// Build the `HttpOnly` session cookie carrying `token`.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(config, token, config.session_ttl_seconds())
}

/// Same attributes as [`session_cookie`], with an empty value and `Max-Age=0`.
pub(super) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(config, "", 0)
}

fn build_cookie(
    config: &AuthConfig,
    value: &str,
    max_age: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let same_site = if config.session_cookie_secure() {
        "None"
    } else {
        "Lax"
    };
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite={same_site}; Max-Age={max_age}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                let val = val.trim();
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::state::Environment;
    use anyhow::Result;
    use secrecy::SecretString;

    fn config(environment: Environment) -> AuthConfig {
        AuthConfig::new(SecretString::from("0123456789abcdef0123456789abcdef"))
            .with_environment(environment)
    }

    #[test]
    fn development_cookie_is_lax_and_not_secure() -> Result<()> {
        let cookie = session_cookie(&config(Environment::Development), "abc")?;
        assert_eq!(
            cookie.to_str()?,
            "token=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800"
        );
        Ok(())
    }

    #[test]
    fn production_cookie_is_cross_site_and_secure() -> Result<()> {
        let cookie = session_cookie(&config(Environment::Production), "abc")?;
        assert_eq!(
            cookie.to_str()?,
            "token=abc; Path=/; HttpOnly; SameSite=None; Max-Age=604800; Secure"
        );
        Ok(())
    }

    #[test]
    fn clearing_cookie_keeps_attributes_and_expires() -> Result<()> {
        let cookie = clear_session_cookie(&config(Environment::Production))?;
        assert_eq!(
            cookie.to_str()?,
            "token=; Path=/; HttpOnly; SameSite=None; Max-Age=0; Secure"
        );
        Ok(())
    }

    #[test]
    fn cookie_max_age_follows_configured_ttl() -> Result<()> {
        let config = config(Environment::Development).with_session_ttl_seconds(60);
        let cookie = session_cookie(&config, "abc")?;
        assert!(cookie.to_str()?.contains("Max-Age=60"));
        Ok(())
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lang=en"),
        );
        assert_eq!(
            extract_session_token(&headers).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("xtoken=abc; tokens=def"));
        assert_eq!(extract_session_token(&headers), None);
    }
}
