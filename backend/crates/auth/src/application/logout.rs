//! Logout Use Case
//!
//! Revokes every refresh token the user holds. Unconditional and
//! idempotent, a second logout is a no-op.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<T>
where
    T: RefreshTokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> LogoutUseCase<T>
where
    T: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<u64> {
        let revoked = self.token_repo.revoke_all_for_user(user_id).await?;
        tracing::info!(%user_id, revoked, "User logged out");
        Ok(revoked)
    }
}
