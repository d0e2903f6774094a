//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;

use crate::application::TokenService;
use crate::domain::entity::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Authenticated user stored in request extensions
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Middleware that requires a valid access token
///
/// The token only proves who the caller was when it was minted; the
/// account is re-checked so a deleted user gets 401 and a locked one
/// gets 403 even while their token is still cryptographically valid.
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.access_cookie_name)
            .ok_or_else(|| AuthError::InvalidToken.into_response())?;

    let token_service = TokenService::new(state.config.clone());
    let claims = token_service
        .verify_access_token(&token)
        .map_err(|e| e.into_response())?;

    let user = state
        .repo
        .find_by_id(&UserId::from_uuid(claims.sub))
        .await
        .map_err(|e| e.into_response())?
        .ok_or_else(|| AuthError::UserNotFound.into_response())?;

    if user.is_locked() {
        return Err(AuthError::AccountLocked {
            minutes_left: user.lock_remaining_minutes(),
        }
        .into_response());
    }

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}
