//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use std::sync::Arc;

use platform::cookie::CookieConfig;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase, RotateUseCase,
    TokenPair,
};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        email: req.email,
        password: req.password,
        name: req.name,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        token_cookie_headers(&state.config, &output.tokens),
        Json(AuthResponse {
            user: UserResponse::from_user(&output.user),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::OK,
        token_cookie_headers(&state.config, &output.tokens),
        Json(AuthResponse {
            user: UserResponse::from_user(&output.user),
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
///
/// An unusable refresh token yields 401 with both token cookies
/// cleared, so a browser stuck in a refresh loop self-heals.
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let presented =
        platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name);

    let Some(presented) = presented else {
        return reject_refresh(&state.config);
    };

    let use_case = RotateUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(&presented).await {
        Ok(Some(tokens)) => (
            StatusCode::OK,
            token_cookie_headers(&state.config, &tokens),
            Json(MessageResponse {
                message: "Token refreshed".to_string(),
            }),
        )
            .into_response(),
        Ok(None) => reject_refresh(&state.config),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout (requires authentication)
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    axum::Extension(auth): axum::Extension<AuthenticatedUser>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone());
    use_case.execute(&auth.user.user_id).await?;

    Ok((
        StatusCode::NO_CONTENT,
        clear_cookie_headers(&state.config),
    ))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me (requires authentication)
pub async fn me(
    axum::Extension(auth): axum::Extension<AuthenticatedUser>,
) -> Json<AuthResponse> {
    Json(AuthResponse {
        user: UserResponse::from_user(&auth.user),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn access_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.access_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.access_ttl_secs()),
    }
}

fn refresh_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.refresh_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        // Scoped so browsers only send it back to the auth endpoints
        path: config.refresh_cookie_path.clone(),
        max_age_secs: Some(config.refresh_ttl_secs()),
    }
}

// Two Set-Cookie headers per response; AppendHeaders keeps both.
fn token_cookie_headers(
    config: &AuthConfig,
    tokens: &TokenPair,
) -> AppendHeaders<[(header::HeaderName, String); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            access_cookie(config).build_set_cookie(&tokens.access_token),
        ),
        (
            header::SET_COOKIE,
            refresh_cookie(config).build_set_cookie(&tokens.refresh_token),
        ),
    ])
}

fn clear_cookie_headers(config: &AuthConfig) -> AppendHeaders<[(header::HeaderName, String); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            access_cookie(config).build_delete_cookie(),
        ),
        (
            header::SET_COOKIE,
            refresh_cookie(config).build_delete_cookie(),
        ),
    ])
}

fn reject_refresh(config: &AuthConfig) -> Response {
    let mut response = AuthError::InvalidToken.into_response();
    let AppendHeaders(headers) = clear_cookie_headers(config);
    for (name, value) in headers {
        if let Ok(value) = header::HeaderValue::from_str(&value) {
            response.headers_mut().append(name, value);
        }
    }
    response
}
