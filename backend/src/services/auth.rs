//! The session lifecycle service: registration, login, refresh-token
//! rotation, logout, and access-token verification. Stateless; every
//! operation is one orchestrated pass over the hasher, the signer, and the
//! storage contract.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationError;

use crate::models::session::Session;
use crate::repositories::auth::{AuthRepository, RepositoryError};
use crate::types::{SessionId, UserId};
use crate::utils::jwt::TokenSigner;
use crate::utils::password::{hash_password, verify_password};
use crate::validation::rules;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad input shape; the message names the first failing rule.
    #[error("{0}")]
    Validation(String),
    /// Unknown login or wrong password. The two cases are deliberately
    /// indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Unknown, malformed, or already-rotated refresh token.
    #[error("invalid session")]
    InvalidSession,
    #[error("session has expired")]
    SessionExpired,
    #[error("invalid access token")]
    InvalidAccessToken,
    #[error("user is blocked")]
    Blocked,
    /// Duplicate email or username at registration.
    #[error("account already exists")]
    Conflict,
    #[error("storage failure")]
    Repository(#[source] RepositoryError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Tokens handed out by a successful login.
#[derive(Debug)]
pub struct LoginTokens {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: String,
}

/// Tokens handed out by a successful rotation.
#[derive(Debug)]
pub struct RotatedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    signer: TokenSigner,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, signer: TokenSigner, session_ttl_days: u64) -> Self {
        Self {
            repo,
            signer,
            session_ttl: Duration::days(session_ttl_days as i64),
        }
    }

    /// Validates the input (username, then email, then password), hashes the
    /// password, and creates the user. No session is created here.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        rules::validate_username(username).map_err(invalid_input)?;
        rules::validate_email(email).map_err(invalid_input)?;
        rules::validate_password(password).map_err(invalid_input)?;

        let password_hash = hash_password(password)?;
        let user_id = UserId::new();

        match self.repo.create_user(user_id, email, username, &password_hash).await {
            Ok(id) => {
                tracing::info!(user_id = %id, "registered new user");
                Ok(id)
            }
            Err(RepositoryError::Conflict) => Err(AuthError::Conflict),
            Err(err) => Err(AuthError::Repository(err)),
        }
    }

    /// Authenticates a login (username or email) and opens a new session
    /// valid for the configured TTL.
    pub async fn login_user(
        &self,
        login: &str,
        password: &str,
        user_agent: &str,
        client_ip: &str,
    ) -> Result<LoginTokens, AuthError> {
        let (user_id, password_hash) = match self.repo.get_user_by_login(login).await {
            Ok(found) => found,
            Err(RepositoryError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(err) => return Err(AuthError::Repository(err)),
        };

        if !verify_password(password, &password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.signer.issue_access_token(user_id)?;

        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            user_id,
            refresh_token: Uuid::new_v4(),
            created_at: now,
            expires_at: now + self.session_ttl,
            user_agent: user_agent.to_string(),
            ip_address: client_ip.to_string(),
        };

        self.repo
            .store_session(user_id, &session)
            .await
            .map_err(AuthError::Repository)?;

        Ok(LoginTokens {
            user_id,
            access_token,
            refresh_token: session.refresh_token.to_string(),
        })
    }

    /// Rotates a session: the presented refresh token dies and a new one
    /// takes its place, with a fresh validity window. An expired session is
    /// deleted here as a side effect; this is the only cleanup path.
    pub async fn refresh_session_token(
        &self,
        refresh_token: &str,
    ) -> Result<RotatedTokens, AuthError> {
        let presented: Uuid = refresh_token
            .parse()
            .map_err(|_| AuthError::InvalidSession)?;

        let mut session = match self.repo.get_session_by_refresh_token(presented).await {
            Ok(session) => session,
            Err(RepositoryError::NotFound) => return Err(AuthError::InvalidSession),
            Err(err) => return Err(AuthError::Repository(err)),
        };

        let now = Utc::now();
        if session.expires_at <= now {
            if let Err(err) = self.repo.delete_session(session.user_id, session.id).await {
                tracing::warn!(
                    session_id = %session.id,
                    error = %err,
                    "failed to remove expired session"
                );
            }
            return Err(AuthError::SessionExpired);
        }

        session.refresh_token = Uuid::new_v4();
        session.created_at = now;
        session.expires_at = now + self.session_ttl;

        match self.repo.refresh_session(&session, presented).await {
            Ok(()) => {}
            // Zero rows matched: a concurrent rotation already consumed the
            // presented token.
            Err(RepositoryError::NotFound) => return Err(AuthError::InvalidSession),
            Err(err) => return Err(AuthError::Repository(err)),
        }

        let access_token = self.signer.issue_access_token(session.user_id)?;

        Ok(RotatedTokens {
            access_token,
            refresh_token: session.refresh_token.to_string(),
        })
    }

    /// Revokes one session. Deleting zero rows is a success (idempotent).
    pub async fn logout_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(), AuthError> {
        self.repo
            .delete_session(user_id, session_id)
            .await
            .map_err(AuthError::Repository)
    }

    /// Revokes every session the user owns. Idempotent.
    pub async fn logout_all_sessions(&self, user_id: UserId) -> Result<(), AuthError> {
        self.repo
            .delete_all_sessions(user_id)
            .await
            .map_err(AuthError::Repository)
    }

    /// Verifies an access token and gates on the blocked flag. This is the
    /// authentication check behind every protected request.
    pub async fn verify_user(&self, access_token: &str) -> Result<UserId, AuthError> {
        let user_id = self
            .signer
            .verify_access_token(access_token)
            .map_err(|err| {
                tracing::debug!(error = %err, "access token rejected");
                AuthError::InvalidAccessToken
            })?;

        match self.repo.user_is_blocked(user_id).await {
            Ok(true) => Err(AuthError::Blocked),
            Ok(false) => Ok(user_id),
            // A subject that no longer exists gets the same answer as a bad
            // token.
            Err(RepositoryError::NotFound) => Err(AuthError::InvalidAccessToken),
            Err(err) => Err(AuthError::Repository(err)),
        }
    }
}

fn invalid_input(err: ValidationError) -> AuthError {
    AuthError::Validation(err.code.to_string())
}
