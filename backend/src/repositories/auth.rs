//! Storage contract for users and sessions.
//!
//! The session lifecycle service depends on storage only through the
//! [`AuthRepository`] trait, which can be mocked with mockall in tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::db::connection::DbPool;
use crate::models::session::Session;
use crate::types::{SessionId, UserId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate record")]
    Conflict,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Creates a user row. `Conflict` when a uniqueness constraint is
    /// violated or the insert does not affect exactly one row.
    async fn create_user(
        &self,
        user_id: UserId,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<UserId, RepositoryError>;

    /// Resolves a login (username or email) to the user id and stored
    /// password hash in a single query.
    async fn get_user_by_login(&self, login: &str) -> Result<(UserId, String), RepositoryError>;

    /// Persists a freshly created session.
    async fn store_session(
        &self,
        user_id: UserId,
        session: &Session,
    ) -> Result<(), RepositoryError>;

    /// Looks a session up by exact refresh-token value.
    async fn get_session_by_refresh_token(
        &self,
        refresh_token: Uuid,
    ) -> Result<Session, RepositoryError>;

    /// Rotates a session in place, guarded by a compare on the refresh-token
    /// value it was read with. `NotFound` when zero rows match, which is how
    /// the loser of a concurrent rotation observes the race.
    async fn refresh_session(
        &self,
        session: &Session,
        previous_refresh_token: Uuid,
    ) -> Result<(), RepositoryError>;

    /// Deletes one session scoped to its owner. Deleting zero rows is not an
    /// error.
    async fn delete_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(), RepositoryError>;

    /// Deletes every session owned by the user. Idempotent.
    async fn delete_all_sessions(&self, user_id: UserId) -> Result<(), RepositoryError>;

    /// True means blocked.
    async fn user_is_blocked(&self, user_id: UserId) -> Result<bool, RepositoryError>;
}

/// Postgres implementation of the storage contract.
pub struct PgAuthRepository {
    pool: DbPool,
}

impl PgAuthRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    async fn create_user(
        &self,
        user_id: UserId,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<UserId, RepositoryError> {
        let result =
            sqlx::query("INSERT INTO users (id, email, username, password_hash) VALUES ($1, $2, $3, $4)")
                .bind(user_id)
                .bind(email)
                .bind(username)
                .bind(password_hash)
                .execute(self.pool.as_ref())
                .await
                .map_err(|err| {
                    if err
                        .as_database_error()
                        .is_some_and(|db| db.is_unique_violation())
                    {
                        RepositoryError::Conflict
                    } else {
                        RepositoryError::Database(err)
                    }
                })?;

        if result.rows_affected() != 1 {
            return Err(RepositoryError::Conflict);
        }
        Ok(user_id)
    }

    async fn get_user_by_login(&self, login: &str) -> Result<(UserId, String), RepositoryError> {
        sqlx::query_as::<_, (UserId, String)>(
            "SELECT id, password_hash FROM users WHERE username = $1 OR email = $1",
        )
        .bind(login)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn store_session(
        &self,
        user_id: UserId,
        session: &Session,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sessions \
             (id, user_id, refresh_token, created_at, expires_at, user_agent, ip_address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(session.id)
        .bind(user_id)
        .bind(session.refresh_token)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn get_session_by_refresh_token(
        &self,
        refresh_token: Uuid,
    ) -> Result<Session, RepositoryError> {
        sqlx::query_as::<_, Session>(
            "SELECT id, user_id, refresh_token, created_at, expires_at, user_agent, ip_address \
             FROM sessions WHERE refresh_token = $1",
        )
        .bind(refresh_token)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn refresh_session(
        &self,
        session: &Session,
        previous_refresh_token: Uuid,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE sessions SET refresh_token = $1, created_at = $2, expires_at = $3 \
             WHERE id = $4 AND refresh_token = $5",
        )
        .bind(session.refresh_token)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.id)
        .bind(previous_refresh_token)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn delete_all_sessions(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn user_is_blocked(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT is_blocked FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
