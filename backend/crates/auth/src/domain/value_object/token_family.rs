//! Token Family Value Object
//!
//! Opaque grouping key shared by every refresh token descended from one
//! login or registration. Rotation inherits the family unchanged, so a
//! single family-wide revocation covers the whole chain when a breach is
//! detected. There is no stored "family" entity; the key itself is the
//! only lineage tracking needed.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Rotation-family identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenFamily(Uuid);

impl TokenFamily {
    /// Generate a fresh family (at login/registration)
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID (from database)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TokenFamily {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
