//! Token Service
//!
//! Issues and verifies the two JWT kinds. Access and refresh tokens are
//! signed with independent HS256 secrets, so one can never be presented
//! in place of the other. Every token carries a random `jti`, which
//! keeps two tokens minted in the same second from serializing to the
//! same string.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::{TokenFamily, UserRole};
use crate::error::{AuthError, AuthResult};

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Random per-token ID
    pub jti: Uuid,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

/// Freshly issued access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Family the refresh token belongs to
    pub family: TokenFamily,
}

/// Stateless JWT issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Issue a short-lived access token
    ///
    /// Returns the signed token and its expiry.
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        self.issue(user_id, email, role, &self.config.access_secret, self.config.access_ttl)
    }

    /// Issue a long-lived refresh token
    ///
    /// Returns the signed token and its expiry. The caller persists the
    /// token string in the ledger together with its family.
    pub fn issue_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        self.issue(user_id, email, role, &self.config.refresh_secret, self.config.refresh_ttl)
    }

    /// Verify an access token's signature and expiry
    pub fn verify_access_token(&self, token: &str) -> AuthResult<TokenClaims> {
        Self::verify(token, &self.config.access_secret)
    }

    /// Verify a refresh token's signature and expiry
    pub fn verify_refresh_token(&self, token: &str) -> AuthResult<TokenClaims> {
        Self::verify(token, &self.config.refresh_secret)
    }

    fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
        secret: &[u8],
        ttl: std::time::Duration,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(ttl.as_secs() as i64);

        let claims = TokenClaims {
            sub: user_id,
            email: email.to_string(),
            role,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))?;

        Ok((token, expires_at))
    }

    fn verify(token: &str, secret: &[u8]) -> AuthResult<TokenClaims> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(Arc::new(AuthConfig::with_random_secrets()))
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let (token, expires_at) = svc
            .issue_access_token(user_id, "a@example.com", UserRole::User)
            .unwrap();

        let claims = svc.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_secrets_are_not_interchangeable() {
        let svc = service();
        let (access, _) = svc
            .issue_access_token(Uuid::new_v4(), "a@example.com", UserRole::User)
            .unwrap();
        let (refresh, _) = svc
            .issue_refresh_token(Uuid::new_v4(), "a@example.com", UserRole::User)
            .unwrap();

        assert!(svc.verify_refresh_token(&access).is_err());
        assert!(svc.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn test_foreign_token_rejected() {
        let svc_a = service();
        let svc_b = service();
        let (token, _) = svc_a
            .issue_refresh_token(Uuid::new_v4(), "a@example.com", UserRole::User)
            .unwrap();

        assert!(svc_b.verify_refresh_token(&token).is_err());
    }

    #[test]
    fn test_same_second_tokens_are_distinct() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let (first, _) = svc
            .issue_refresh_token(user_id, "a@example.com", UserRole::User)
            .unwrap();
        let (second, _) = svc
            .issue_refresh_token(user_id, "a@example.com", UserRole::User)
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Arc::new(AuthConfig::with_random_secrets());
        let svc = TokenService::new(config.clone());

        // Expired an hour ago, well past the default validation leeway
        let now = Utc::now();
        let claims = TokenClaims {
            sub: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            role: UserRole::User,
            jti: Uuid::new_v4(),
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&config.access_secret),
        )
        .unwrap();

        assert!(matches!(
            svc.verify_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = service();
        assert!(matches!(
            svc.verify_access_token("not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
