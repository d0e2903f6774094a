//! Register Use Case
//!
//! Creates a new account and issues its first token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::{RefreshTokenRecord, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{DisplayName, Email, RawPassword, TokenFamily, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Register output
pub struct RegisterOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Register use case
pub struct RegisterUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    token_service: TokenService,
    config: Arc<AuthConfig>,
}

impl<U, T> RegisterUseCase<U, T>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(&input.email)?;
        let name = DisplayName::new(&input.name)?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(email, password_hash, name);

        // A concurrent registration can still slip past the check above;
        // the unique constraint on email surfaces it as EmailTaken.
        self.user_repo.create(&user).await?;

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

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(RegisterOutput {
            user,
            tokens: TokenPair {
                access_token,
                refresh_token,
                family,
            },
        })
    }
}
