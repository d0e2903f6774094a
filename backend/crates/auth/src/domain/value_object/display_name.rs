//! Display Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Minimum display name length
const NAME_MIN_LENGTH: usize = 2;

/// Maximum display name length
const NAME_MAX_LENGTH: usize = 100;

/// User display name (2..=100 characters, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new display name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        let char_count = name.chars().count();

        if char_count < NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {} characters",
                NAME_MIN_LENGTH
            )));
        }

        if char_count > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name cannot exceed {} characters",
                NAME_MAX_LENGTH
            )));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(DisplayName::new("Ann").is_ok());
        assert!(DisplayName::new("山田 太郎").is_ok());
        assert_eq!(DisplayName::new("  Ann  ").unwrap().as_str(), "Ann");
    }

    #[test]
    fn test_too_short() {
        assert!(DisplayName::new("A").is_err());
        assert!(DisplayName::new("").is_err());
        assert!(DisplayName::new("   ").is_err());
    }

    #[test]
    fn test_too_long() {
        let long = "a".repeat(NAME_MAX_LENGTH + 1);
        assert!(DisplayName::new(long).is_err());

        let max = "a".repeat(NAME_MAX_LENGTH);
        assert!(DisplayName::new(max).is_ok());
    }
}
