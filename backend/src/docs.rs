#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::user::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshResponse, RegisterRequest, RegisterResponse,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(register_doc, login_doc, refresh_doc, logout_doc, logout_all_doc),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        RefreshResponse,
        LogoutRequest
    )),
    modifiers(&BearerAuth),
    tags((name = "auth", description = "Credential registration and session lifecycle"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "A validation rule failed"),
        (status = 409, description = "Email or username already taken"),
    )
)]
fn register_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token in the body, refresh token as a cookie", body = LoginResponse),
        (status = 401, description = "Unknown login or wrong password"),
    )
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "Session rotated; the previous refresh token is dead", body = RefreshResponse),
        (status = 400, description = "Refresh token cookie missing"),
        (status = 401, description = "Unknown, expired, or already-rotated session"),
    )
)]
fn refresh_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    request_body = LogoutRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Session revoked (idempotent)"),
        (status = 401, description = "Missing or invalid access token"),
    )
)]
fn logout_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout-all",
    tag = "auth",
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "All sessions revoked (idempotent)"),
        (status = 401, description = "Missing or invalid access token"),
    )
)]
fn logout_all_doc() {}
