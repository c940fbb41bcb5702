use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: i64,    // expiration time
    pub iat: i64,    // issued at
    pub jti: String, // JWT ID
}

impl Claims {
    fn new(user_id: UserId, expiration_minutes: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(expiration_minutes as i64);

        Self {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Issues and verifies the short-lived HS256 access tokens asserting a user
/// identity. Verification enforces signature, algorithm, and expiry in one
/// call; callers never check expiry themselves.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    expiration_minutes: u64,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, expiration_minutes: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes,
        }
    }

    pub fn issue_access_token(&self, user_id: UserId) -> anyhow::Result<String> {
        let claims = Claims::new(user_id, self.expiration_minutes);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn verify_access_token(&self, token: &str) -> anyhow::Result<UserId> {
        // Validation::default() pins HS256 and enforces `exp`.
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        if token_data.claims.sub.is_empty() {
            bail!("token subject is empty");
        }
        let user_id = token_data
            .claims
            .sub
            .parse::<Uuid>()
            .context("token subject is not a valid user id")?;

        Ok(UserId::from_uuid(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("secret", 15)
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let user_id = UserId::new();
        let token = signer().issue_access_token(user_id).expect("issue token");
        let verified = signer().verify_access_token(&token).expect("verify token");
        assert_eq!(verified, user_id);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = signer()
            .issue_access_token(UserId::new())
            .expect("issue token");
        let other = TokenSigner::new("other-secret", 15);
        assert!(other.verify_access_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(signer().verify_access_token("not.a.jwt").is_err());
        assert!(signer().verify_access_token("").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        // `exp` must sit beyond the default 60s leeway to actually fail.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            exp: now - 120,
            iat: now - 180,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode");
        assert!(signer().verify_access_token(&token).is_err());
    }

    #[test]
    fn rejects_empty_subject() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: String::new(),
            exp: now + 300,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode");
        assert!(signer().verify_access_token(&token).is_err());
    }
}
