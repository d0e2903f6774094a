//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{RefreshTokenRecord, User};
use crate::domain::value_object::{Email, TokenFamily};
use crate::error::AuthResult;
use kernel::id::UserId;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Refresh token ledger trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a new token record
    async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()>;

    /// Look up a record by its exact token string
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Revoke a single record by token string
    async fn revoke(&self, token: &str) -> AuthResult<()>;

    /// Revoke every record in a rotation family, returns affected count
    async fn revoke_family(&self, family: &TokenFamily) -> AuthResult<u64>;

    /// Revoke every active record belonging to a user, returns affected count
    async fn revoke_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// Delete records whose stored expiry has passed, returns deleted count
    async fn delete_expired(&self) -> AuthResult<u64>;
}
