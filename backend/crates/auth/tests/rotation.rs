//! End-to-end tests for the session lifecycle: register, login,
//! refresh-token rotation, reuse detection, logout, and lockout.
//! Runs against the in-memory repository.

use std::sync::Arc;

use auth::application::{
    AuthConfig, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterOutput,
    RegisterUseCase, RotateUseCase, TokenPair,
};
use auth::domain::entity::RefreshTokenRecord;
use auth::domain::repository::RefreshTokenRepository;
use auth::domain::value_object::TokenFamily;
use auth::error::AuthError;
use auth::infra::memory::InMemoryAuthRepository;

struct Harness {
    repo: Arc<InMemoryAuthRepository>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(AuthConfig::with_random_secrets())
    }

    fn with_config(config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(InMemoryAuthRepository::new()),
            config: Arc::new(config),
        }
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> RegisterOutput {
        let use_case =
            RegisterUseCase::new(self.repo.clone(), self.repo.clone(), self.config.clone());
        use_case
            .execute(RegisterInput {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            })
            .await
            .expect("registration should succeed")
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let use_case = LoginUseCase::new(self.repo.clone(), self.repo.clone(), self.config.clone());
        use_case
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map(|out| out.tokens)
    }

    async fn rotate(&self, token: &str) -> Option<TokenPair> {
        let use_case = RotateUseCase::new(self.repo.clone(), self.config.clone());
        use_case
            .execute(token)
            .await
            .expect("rotation should not hit infrastructure errors")
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_stores_hash_not_plaintext() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;

    let phc = out.user.password_hash.as_phc_string();
    assert_ne!(phc, "Passw0rd!");
    assert!(phc.starts_with("$argon2"));
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let h = Harness::new();
    h.register("a@x.com", "Passw0rd!", "Ann").await;

    let use_case = RegisterUseCase::new(h.repo.clone(), h.repo.clone(), h.config.clone());
    let result = use_case
        .execute(RegisterInput {
            email: "A@X.COM".to_string(),
            password: "Passw0rd!".to_string(),
            name: "Ann Again".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AuthError::EmailTaken)));
}

// ============================================================================
// Rotation
// ============================================================================

#[tokio::test]
async fn rotate_returns_new_pair_and_kills_old_token() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;

    let rotated = h.rotate(&out.tokens.refresh_token).await;
    let rotated = rotated.expect("valid token should rotate");
    assert_ne!(rotated.refresh_token, out.tokens.refresh_token);
    assert_eq!(rotated.family, out.tokens.family);

    // The old token is now stale
    let entry = h
        .repo
        .find_by_token(&out.tokens.refresh_token)
        .await
        .unwrap()
        .expect("rotated entry stays in the ledger");
    assert!(entry.revoked);
}

#[tokio::test]
async fn rotate_unknown_token_returns_none() {
    let h = Harness::new();
    assert!(h.rotate("never-issued").await.is_none());
}

#[tokio::test]
async fn replay_revokes_whole_family() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;
    let a = out.tokens.refresh_token;

    let b = h.rotate(&a).await.expect("A rotates to B").refresh_token;
    let c = h.rotate(&b).await.expect("B rotates to C").refresh_token;

    // A is replayed after C exists
    assert!(h.rotate(&a).await.is_none());

    // The reuse event took C down even though C was never replayed
    assert!(h.rotate(&c).await.is_none());
}

#[tokio::test]
async fn full_reuse_scenario() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;
    let tokens1 = out.tokens;

    let tokens2 = h
        .rotate(&tokens1.refresh_token)
        .await
        .expect("first rotation succeeds");

    assert!(h.rotate(&tokens1.refresh_token).await.is_none());
    assert!(h.rotate(&tokens2.refresh_token).await.is_none());
}

#[tokio::test]
async fn rotate_expired_entry_returns_none_and_revokes() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;

    // Plant an already-expired entry for the same user
    let expired = RefreshTokenRecord::new(
        out.user.user_id,
        "expired-token".to_string(),
        TokenFamily::new(),
        chrono::Utc::now() - chrono::Duration::hours(1),
    );
    h.repo.create(&expired).await.unwrap();

    assert!(h.rotate("expired-token").await.is_none());

    let entry = h
        .repo
        .find_by_token("expired-token")
        .await
        .unwrap()
        .unwrap();
    assert!(entry.revoked);
}

#[tokio::test]
async fn rotate_foreign_signed_entry_returns_none_and_revokes() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;

    // A ledger entry whose token was never signed with our secret
    let foreign = RefreshTokenRecord::new(
        out.user.user_id,
        "not-a-real-jwt".to_string(),
        TokenFamily::new(),
        chrono::Utc::now() + chrono::Duration::days(7),
    );
    h.repo.create(&foreign).await.unwrap();

    assert!(h.rotate("not-a-real-jwt").await.is_none());

    let entry = h
        .repo
        .find_by_token("not-a-real-jwt")
        .await
        .unwrap()
        .unwrap();
    assert!(entry.revoked);
}

#[tokio::test]
async fn logins_use_distinct_families() {
    let h = Harness::new();
    h.register("a@x.com", "Passw0rd!", "Ann").await;

    let first = h.login("a@x.com", "Passw0rd!").await.unwrap();
    let second = h.login("a@x.com", "Passw0rd!").await.unwrap();

    assert_ne!(first.family, second.family);

    // Rotating one chain leaves the other alive
    assert!(h.rotate(&first.refresh_token).await.is_some());
    assert!(h.rotate(&second.refresh_token).await.is_some());
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn logout_kills_every_issued_token() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;
    let login_tokens = h.login("a@x.com", "Passw0rd!").await.unwrap();

    let use_case = LogoutUseCase::new(h.repo.clone());
    let revoked = use_case.execute(&out.user.user_id).await.unwrap();
    assert_eq!(revoked, 2);

    assert!(h.rotate(&out.tokens.refresh_token).await.is_none());
    assert!(h.rotate(&login_tokens.refresh_token).await.is_none());

    // Idempotent
    let again = use_case.execute(&out.user.user_id).await.unwrap();
    assert_eq!(again, 0);
}

// ============================================================================
// Login and lockout
// ============================================================================

#[tokio::test]
async fn login_failure_messages_do_not_reveal_account_existence() {
    let h = Harness::new();
    h.register("a@x.com", "Passw0rd!", "Ann").await;

    let unknown = h.login("ghost@x.com", "Passw0rd!").await.unwrap_err();
    let wrong = h.login("a@x.com", "WrongPass1!").await.unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn lockout_after_threshold_blocks_correct_password() {
    let h = Harness::new();
    h.register("b@x.com", "Passw0rd!", "Ben").await;

    // N-1 failures: still not locked
    for _ in 0..4 {
        let err = h.login("b@x.com", "WrongPass1!").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    // Nth failure locks
    let err = h.login("b@x.com", "WrongPass1!").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    // Correct password now fails Forbidden, with the wait time disclosed
    let err = h.login("b@x.com", "Passw0rd!").await.unwrap_err();
    match err {
        AuthError::AccountLocked { minutes_left } => {
            assert!(minutes_left > 0);
            assert!(minutes_left <= 30);
        }
        other => panic!("expected AccountLocked, got {other:?}"),
    }
}

#[tokio::test]
async fn successful_login_after_lock_expiry_resets_counter() {
    // Zero lockout duration: the lock expires the moment it is set
    let config = AuthConfig {
        lockout_duration: std::time::Duration::from_secs(0),
        ..AuthConfig::with_random_secrets()
    };
    let h = Harness::with_config(config);
    h.register("b@x.com", "Passw0rd!", "Ben").await;

    for _ in 0..5 {
        let _ = h.login("b@x.com", "WrongPass1!").await.unwrap_err();
    }

    // Lock already expired, correct password succeeds
    h.login("b@x.com", "Passw0rd!").await.unwrap();

    let email = auth::domain::value_object::Email::new("b@x.com").unwrap();
    let user = {
        use auth::domain::repository::UserRepository;
        h.repo.find_by_email(&email).await.unwrap().unwrap()
    };
    assert_eq!(user.failed_login_attempts, 0);
    assert!(user.locked_until.is_none());
}

#[tokio::test]
async fn successful_login_resets_failure_count() {
    let h = Harness::new();
    h.register("a@x.com", "Passw0rd!", "Ann").await;

    for _ in 0..3 {
        let _ = h.login("a@x.com", "WrongPass1!").await.unwrap_err();
    }

    h.login("a@x.com", "Passw0rd!").await.unwrap();

    let email = auth::domain::value_object::Email::new("a@x.com").unwrap();
    let user = {
        use auth::domain::repository::UserRepository;
        h.repo.find_by_email(&email).await.unwrap().unwrap()
    };
    assert_eq!(user.failed_login_attempts, 0);
}

// ============================================================================
// Ledger hygiene
// ============================================================================

#[tokio::test]
async fn delete_expired_removes_only_stale_records() {
    let h = Harness::new();
    let out = h.register("a@x.com", "Passw0rd!", "Ann").await;

    let expired = RefreshTokenRecord::new(
        out.user.user_id,
        "stale".to_string(),
        TokenFamily::new(),
        chrono::Utc::now() - chrono::Duration::days(1),
    );
    h.repo.create(&expired).await.unwrap();

    let deleted = h.repo.delete_expired().await.unwrap();
    assert_eq!(deleted, 1);

    assert!(h.repo.find_by_token("stale").await.unwrap().is_none());
    assert!(h
        .repo
        .find_by_token(&out.tokens.refresh_token)
        .await
        .unwrap()
        .is_some());
}
