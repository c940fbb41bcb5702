//! HTTP adapter for the session lifecycle service. Handlers extract
//! primitive fields, make one service call, and shape the result; the
//! refresh token travels in an HttpOnly cookie scoped to the auth routes.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};

use crate::{
    config::Config,
    error::AppError,
    models::user::{
        LoginRequest, LoginResponse, LogoutRequest, RefreshResponse, RegisterRequest,
        RegisterResponse,
    },
    state::AppState,
    types::UserId,
    utils::cookies::{
        build_auth_cookie, build_clear_cookie, extract_cookie_value, CookieOptions, SameSite,
        REFRESH_COOKIE_NAME, REFRESH_COOKIE_PATH,
    },
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user_id = state
        .auth
        .register_user(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = user_agent(&headers);
    let client_ip = client_address(&headers, peer);

    let tokens = state
        .auth
        .login_user(&payload.login, &payload.password, user_agent, &client_ip)
        .await?;

    let cookie = refresh_cookie(&state.config, &tokens.refresh_token);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            user_id: tokens.user_id,
            access_token: tokens.access_token,
        }),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let refresh_token = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| extract_cookie_value(raw, REFRESH_COOKIE_NAME))
        .ok_or_else(|| AppError::BadRequest("Refresh token cookie is required".to_string()))?;

    let tokens = state.auth.refresh_session_token(&refresh_token).await?;

    let cookie = refresh_cookie(&state.config, &tokens.refresh_token);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(RefreshResponse {
            access_token: tokens.access_token,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Json(payload): Json<LogoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth
        .logout_session(user_id, payload.session_id)
        .await?;

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, clear_refresh_cookie(&state.config))]),
    ))
}

pub async fn logout_all(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.logout_all_sessions(user_id).await?;

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, clear_refresh_cookie(&state.config))]),
    ))
}

fn cookie_options(config: &Config) -> CookieOptions {
    CookieOptions {
        secure: config.cookie_secure,
        same_site: SameSite::Lax,
    }
}

fn refresh_cookie(config: &Config, value: &str) -> String {
    let max_age = Duration::from_secs(config.session_ttl_days * 24 * 60 * 60);
    build_auth_cookie(
        REFRESH_COOKIE_NAME,
        value,
        max_age,
        REFRESH_COOKIE_PATH,
        cookie_options(config),
    )
}

fn clear_refresh_cookie(config: &Config) -> String {
    build_clear_cookie(REFRESH_COOKIE_NAME, REFRESH_COOKIE_PATH, cookie_options(config))
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
}

/// Proxy headers first, then the socket peer.
fn client_address(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        // The first entry is the originating client.
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        return real_ip.to_string();
    }

    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.9:4321".parse().expect("socket addr")
    }

    #[test]
    fn client_address_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_address(&headers, peer()), "203.0.113.7");
    }

    #[test]
    fn client_address_falls_back_to_real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_address(&headers, peer()), "198.51.100.2");

        assert_eq!(client_address(&HeaderMap::new(), peer()), "10.0.0.9");
    }

    #[test]
    fn user_agent_defaults_to_unknown() {
        assert_eq!(user_agent(&HeaderMap::new()), "unknown");

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        assert_eq!(user_agent(&headers), "curl/8.0");
    }
}
