//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered
    #[error("Email already in use")]
    EmailTaken,

    /// Invalid credentials (unknown email or wrong password, indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is locked (too many failed attempts)
    #[error("Account is locked. Try again in {minutes_left} minutes")]
    AccountLocked { minutes_left: i64 },

    /// Refresh or access token rejected (missing, expired, revoked, or forged)
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token references a user that no longer exists
    #[error("User no longer exists")]
    UserNotFound,

    /// A token string was issued twice (unique constraint on the ledger)
    #[error("Token collision detected")]
    TokenCollision,

    /// Request payload failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken | AuthError::TokenCollision => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::AccountLocked { .. } => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::TokenCollision => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::UserNotFound => ErrorKind::Unauthorized,
            AuthError::AccountLocked { .. } => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::TokenCollision => {
                tracing::error!("Refresh token collision detected");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked { minutes_left } => {
                tracing::warn!(minutes_left, "Login attempt on locked account");
            }
            AuthError::UserNotFound => {
                tracing::warn!("Token for a vanished user");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountLocked { minutes_left: 12 }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_locked_message_discloses_wait_time() {
        let err = AuthError::AccountLocked { minutes_left: 12 };
        assert!(err.to_string().contains("12 minutes"));
    }

    #[test]
    fn test_credentials_message_does_not_disclose_which_field() {
        let msg = AuthError::InvalidCredentials.to_string();
        assert!(!msg.to_lowercase().contains("unknown"));
        assert!(!msg.to_lowercase().contains("not found"));
    }
}
