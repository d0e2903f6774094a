//! Login Use Case
//!
//! Authenticates a user, enforcing the temporary lockout, and issues a
//! fresh token pair under a new rotation family.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::{RefreshTokenRecord, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{Email, RawPassword, TokenFamily};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Login use case
pub struct LoginUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    token_service: TokenService,
    config: Arc<AuthConfig>,
}

impl<U, T> LoginUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            token_repo,
            token_service: TokenService::new(config.clone()),
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Unknown email and wrong password must be indistinguishable
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Lockout wins over password correctness
        if user.is_locked() {
            return Err(AuthError::AccountLocked {
                minutes_left: user.lock_remaining_minutes(),
            });
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            user.record_failed_attempt(
                self.config.max_login_attempts,
                chrono::Duration::seconds(self.config.lockout_duration.as_secs() as i64),
            );
            self.user_repo.update(&user).await?;
            return Err(AuthError::InvalidCredentials);
        }

        if user.failed_login_attempts > 0 || user.locked_until.is_some() {
            user.reset_failed_attempts();
            self.user_repo.update(&user).await?;
        }

        let family = TokenFamily::new();
        let (access_token, _) = self.token_service.issue_access_token(
            *user.user_id.as_uuid(),
            user.email.as_str(),
            user.role,
        )?;
        let (refresh_token, refresh_expires_at) = self.token_service.issue_refresh_token(
            *user.user_id.as_uuid(),
            user.email.as_str(),
            user.role,
        )?;

        let record = RefreshTokenRecord::new(
            user.user_id,
            refresh_token.clone(),
            family,
            refresh_expires_at,
        );
        self.token_repo.create(&record).await?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput {
            user,
            tokens: TokenPair {
                access_token,
                refresh_token,
                family,
            },
        })
    }
}
