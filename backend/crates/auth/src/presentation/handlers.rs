//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::client::{ClientAddr, extract_fingerprint};
use platform::cookie::extract_session_token;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, ProfileUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, MeResponse, SessionStatusResponse, SignUpRequest, SignUpResponse,
    UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<SignUpResponse>)>
where
    R: AuthStore,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            full_name: req.full_name,
            email: req.email,
            mobile: req.mobile,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user: UserResponse::from(&output.user),
            officer: output.officer.as_ref().map(Into::into),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
{
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(
            SignInInput {
                identifier: req.identifier,
                password: req.password,
            },
            fingerprint,
        )
        .await?;

    let cookie = state
        .config
        .cookie()
        .build_set_cookie(&output.session_token, state.config.session_ttl.as_secs());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: output.session_token,
            token_type: "bearer",
            user: UserResponse::from(&output.user),
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: AuthStore,
{
    if let Some(token) = extract_session_token(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared regardless
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Logout with unusable session token");
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, state.config.cookie().build_delete_cookie())],
    )
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    R: AuthStore,
{
    let fingerprint = extract_fingerprint(&headers, client_ip).ok();
    let token = extract_session_token(&headers, &state.config.session_cookie_name);

    let session_info = match (token, fingerprint) {
        (Some(token), Some(fp)) => {
            let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
            use_case.execute(&token, &fp.hash).await.ok()
        }
        _ => None,
    };

    Json(match session_info {
        Some(info) => SessionStatusResponse {
            authenticated: true,
            user_id: Some(info.user_id),
            role: Some(info.user_role),
            expires_at_ms: Some(info.expires_at_ms),
        },
        None => SessionStatusResponse {
            authenticated: false,
            user_id: None,
            role: None,
            expires_at_ms: None,
        },
    })
}

// ============================================================================
// Current user (requires authentication)
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> AuthResult<Json<MeResponse>>
where
    R: AuthStore,
{
    let output = ProfileUseCase::new(state.repo.clone())
        .execute(&current.user_id)
        .await?;

    Ok(Json(MeResponse {
        user: UserResponse::from(&output.user),
        officer: output.officer.as_ref().map(Into::into),
    }))
}
