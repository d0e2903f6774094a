//! In-Memory Repository Implementation
//!
//! HashMap-backed repository used by integration tests and local
//! experiments. Enforces the same uniqueness rules as the Postgres
//! schema. Guards are never held across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::entity::{RefreshTokenRecord, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{Email, TokenFamily};
use crate::error::{AuthError, AuthResult};

/// In-memory auth repository
#[derive(Default)]
pub struct InMemoryAuthRepository {
    users: RwLock<HashMap<Uuid, User>>,
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn users_read(&self) -> AuthResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .read()
            .map_err(|_| AuthError::Internal("User store lock poisoned".to_string()))
    }

    fn users_write(&self) -> AuthResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .write()
            .map_err(|_| AuthError::Internal("User store lock poisoned".to_string()))
    }

    fn tokens_read(
        &self,
    ) -> AuthResult<std::sync::RwLockReadGuard<'_, HashMap<String, RefreshTokenRecord>>> {
        self.tokens
            .read()
            .map_err(|_| AuthError::Internal("Token store lock poisoned".to_string()))
    }

    fn tokens_write(
        &self,
    ) -> AuthResult<std::sync::RwLockWriteGuard<'_, HashMap<String, RefreshTokenRecord>>> {
        self.tokens
            .write()
            .map_err(|_| AuthError::Internal("Token store lock poisoned".to_string()))
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users_write()?;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users_read()?.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users_read()?
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users_write()?;
        users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }
}

impl RefreshTokenRepository for InMemoryAuthRepository {
    async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        let mut tokens = self.tokens_write()?;

        if tokens.contains_key(&record.token) {
            return Err(AuthError::TokenCollision);
        }

        tokens.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        Ok(self.tokens_read()?.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        if let Some(record) = self.tokens_write()?.get_mut(token) {
            record.revoke();
        }
        Ok(())
    }

    async fn revoke_family(&self, family: &TokenFamily) -> AuthResult<u64> {
        let mut revoked = 0;
        for record in self.tokens_write()?.values_mut() {
            if record.family == *family && !record.revoked {
                record.revoke();
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let mut revoked = 0;
        for record in self.tokens_write()?.values_mut() {
            if record.user_id == *user_id && !record.revoked {
                record.revoke();
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let mut tokens = self.tokens_write()?;
        let before = tokens.len();
        tokens.retain(|_, record| !record.is_expired());
        Ok((before - tokens.len()) as u64)
    }
}
