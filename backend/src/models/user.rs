//! Request and response payloads for the authentication API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::{SessionId, UserId};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Payload for creating a new user account.
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Identifier of a freshly registered user.
pub struct RegisterResponse {
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    /// Username or email address.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Successful login: the access token travels in the body, the refresh token
/// in an HttpOnly cookie.
pub struct LoginResponse {
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Fresh access token produced by a session rotation.
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Names the session to revoke; the owning user comes from the access token.
pub struct LogoutRequest {
    #[schema(value_type = uuid::Uuid)]
    pub session_id: SessionId,
}
