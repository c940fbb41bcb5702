//! Session records binding refresh tokens to users.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{SessionId, UserId};

#[derive(Debug, Clone, PartialEq, FromRow)]
/// One active login instance for a user. Created at login, rotated in place on
/// every successful refresh, deleted by logout or lazily once expired.
pub struct Session {
    /// Unique identifier for the session record.
    pub id: SessionId,
    /// User who owns the session.
    pub user_id: UserId,
    /// Opaque rotating credential; the only key sessions are looked up by.
    pub refresh_token: Uuid,
    /// Timestamp of creation or of the most recent rotation.
    pub created_at: DateTime<Utc>,
    /// Timestamp after which the session can no longer be refreshed.
    pub expires_at: DateTime<Utc>,
    /// User agent reported by the client at login.
    pub user_agent: String,
    /// Client network address observed at login.
    pub ip_address: String,
}
