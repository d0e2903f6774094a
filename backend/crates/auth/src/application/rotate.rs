//! Rotate Use Case
//!
//! The refresh-token rotation state machine. An unusable token is a
//! steady-state occurrence, not an error, so the outcome is
//! `Ok(None)` for every rejection path; only infrastructure failures
//! (database, signing, token collision) surface as errors.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::RefreshTokenRecord;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Rotate use case
pub struct RotateUseCase<T>
where
    T: RefreshTokenRepository,
{
    token_repo: Arc<T>,
    token_service: TokenService,
}

impl<T> RotateUseCase<T>
where
    T: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<T>, config: Arc<AuthConfig>) -> Self {
        Self {
            token_repo,
            token_service: TokenService::new(config),
        }
    }

    /// Rotate a presented refresh token
    ///
    /// The checks run in a fixed order: revocation state first, then
    /// stored expiry, then signature. Reuse detection is the
    /// highest-value signal and must fire even when the replayed token
    /// has also expired in the meantime.
    pub async fn execute(&self, presented_token: &str) -> AuthResult<Option<TokenPair>> {
        let Some(entry) = self.token_repo.find_by_token(presented_token).await? else {
            return Ok(None);
        };

        if entry.revoked {
            // Replay of an already-rotated token. Someone (the thief or
            // the legitimate client) holds a live descendant, so the
            // whole family goes down with it.
            let revoked = self.token_repo.revoke_family(&entry.family).await?;
            tracing::warn!(
                user_id = %entry.user_id,
                family = %entry.family,
                revoked,
                "Refresh token reuse detected, family revoked"
            );
            return Ok(None);
        }

        if entry.is_expired() {
            self.token_repo.revoke(presented_token).await?;
            return Ok(None);
        }

        // A ledger entry should never fail this under normal operation,
        // but a corrupted or foreign entry must not be honored.
        let claims = match self.token_service.verify_refresh_token(presented_token) {
            Ok(claims) => claims,
            Err(_) => {
                self.token_repo.revoke(presented_token).await?;
                return Ok(None);
            }
        };

        self.token_repo.revoke(presented_token).await?;

        let (access_token, _) =
            self.token_service
                .issue_access_token(claims.sub, &claims.email, claims.role)?;
        let (refresh_token, refresh_expires_at) =
            self.token_service
                .issue_refresh_token(claims.sub, &claims.email, claims.role)?;

        // Same family as the rotated entry, preserving the lineage the
        // reuse check needs.
        let record = RefreshTokenRecord::new(
            entry.user_id,
            refresh_token.clone(),
            entry.family,
            refresh_expires_at,
        );
        self.token_repo.create(&record).await?;

        Ok(Some(TokenPair {
            access_token,
            refresh_token,
            family: entry.family,
        }))
    }
}
