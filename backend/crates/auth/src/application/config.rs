//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens (32 bytes)
    pub access_secret: [u8; 32],
    /// HMAC secret for signing refresh tokens (32 bytes, independent of access)
    pub refresh_secret: [u8; 32],
    /// Access token lifetime (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token lifetime (7 days)
    pub refresh_ttl: Duration,
    /// Consecutive failures before lockout
    pub max_login_attempts: u16,
    /// Lockout duration after too many failures (30 minutes)
    pub lockout_duration: Duration,
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Path the refresh cookie is scoped to (the auth mount point)
    pub refresh_cookie_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

// Secrets are always random at construction. Production overrides them
// with the values loaded from the environment; a config that is never
// overridden still cannot verify anyone else's tokens.
impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secrets()
    }
}

impl AuthConfig {
    /// Create config with random signing secrets
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;
        let mut access_secret = [0u8; 32];
        let mut refresh_secret = [0u8; 32];
        rand::rng().fill_bytes(&mut access_secret);
        rand::rng().fill_bytes(&mut refresh_secret);
        Self {
            access_secret,
            refresh_secret,
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            max_login_attempts: 5,
            lockout_duration: Duration::from_secs(30 * 60),
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            refresh_cookie_path: "/api/auth".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Access token lifetime in whole seconds (for cookie Max-Age)
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.as_secs() as i64
    }

    /// Refresh token lifetime in whole seconds (for cookie Max-Age)
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.as_secs() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
