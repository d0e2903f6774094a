//! User Entity
//!
//! Account aggregate: identity, credentials and login failure tracking
//! live together because every credential decision (verify, lock, reset)
//! needs them in one place.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{DisplayName, Email, UserPassword, UserRole};

/// User account entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, normalized (lowercased) email
    pub email: Email,
    /// Argon2id password hash
    pub password_hash: UserPassword,
    pub name: DisplayName,
    pub role: UserRole,
    /// Consecutive login failure count
    pub failed_login_attempts: u16,
    /// Account locked until (temporary lockout after failures)
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user account with default role
    pub fn new(email: Email, password_hash: UserPassword, name: DisplayName) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            name,
            role: UserRole::default(),
            failed_login_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if account is currently locked
    pub fn is_locked(&self) -> bool {
        if let Some(locked_until) = self.locked_until {
            Utc::now() < locked_until
        } else {
            false
        }
    }

    /// Minutes until the current lock expires, rounded up.
    ///
    /// Returns 0 when the account is not locked. Used for the
    /// "try again in N minutes" message.
    pub fn lock_remaining_minutes(&self) -> i64 {
        match self.locked_until {
            Some(locked_until) => {
                let remaining = locked_until - Utc::now();
                if remaining <= Duration::zero() {
                    0
                } else {
                    let secs = remaining.num_seconds();
                    (secs + 59) / 60
                }
            }
            None => 0,
        }
    }

    /// Record a failed login attempt
    ///
    /// A lock that has already expired means the previous failure streak
    /// is over, so the counter restarts at 1 instead of compounding.
    /// Reaching `max_attempts` locks the account for `lockout_duration`.
    pub fn record_failed_attempt(&mut self, max_attempts: u16, lockout_duration: Duration) {
        let now = Utc::now();

        match self.locked_until {
            Some(locked_until) if locked_until <= now => {
                self.failed_login_attempts = 1;
                self.locked_until = None;
            }
            _ => {
                self.failed_login_attempts += 1;
                if self.failed_login_attempts >= max_attempts {
                    self.locked_until = Some(now + lockout_duration);
                }
            }
        }

        self.updated_at = now;
    }

    /// Reset login failure tracking on successful authentication
    pub fn reset_failed_attempts(&mut self) {
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    /// Update password
    pub fn set_password(&mut self, new_password: UserPassword) {
        self.password_hash = new_password;
        self.updated_at = Utc::now();
    }

    /// Update display name
    pub fn set_name(&mut self, name: DisplayName) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}
