//! Refresh Token Entity
//!
//! Persisted record for one issued refresh token. Records are never
//! deleted on rotation, only flagged revoked, so a replayed token string
//! can still be found and recognized as already used.

use chrono::{DateTime, Utc};
use kernel::id::{RefreshTokenId, UserId};

use crate::domain::value_object::TokenFamily;

/// Stored refresh token record
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    /// The signed JWT string, stored verbatim (unique per record)
    pub token: String,
    /// Rotation family inherited across the whole chain
    pub family: TokenFamily,
    pub expires_at: DateTime<Utc>,
    /// Set on rotation, logout, or family-wide revocation
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Create a new active record
    pub fn new(
        user_id: UserId,
        token: String,
        family: TokenFamily,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RefreshTokenId::new(),
            user_id,
            token,
            family,
            expires_at,
            revoked: false,
            created_at: Utc::now(),
        }
    }

    /// Check if the record's stored expiry has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Mark this record as revoked
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}
