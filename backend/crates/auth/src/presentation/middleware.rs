//! Auth Middleware
//!
//! Resolves the session for protected routes and hands the caller to
//! handlers as a [`CurrentUser`] request extension.

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::{Request, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::{AuthSessionId, UserId};
use platform::client::{extract_client_ip, extract_fingerprint};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    /// Roles allowed through; empty admits any signed-in user
    pub roles: &'static [UserRole],
}

impl<R> AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            config,
            roles: &[],
        }
    }

    pub fn with_roles(mut self, roles: &'static [UserRole]) -> Self {
        self.roles = roles;
        self
    }
}

/// The authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub role: UserRole,
    pub session_id: AuthSessionId,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AuthError::SessionInvalid)
    }
}

/// Middleware that requires a valid auth session, and one of the configured roles
pub async fn require_auth_session<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client_ip = extract_client_ip(headers, client_ip);

    let fingerprint = match extract_fingerprint(headers, client_ip) {
        Ok(fp) => fp,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    let Some(token) =
        platform::cookie::extract_session_token(headers, &state.config.session_cookie_name)
    else {
        return Err(AuthError::SessionInvalid.into_response());
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let session = use_case
        .get_session(&token, &fingerprint.hash)
        .await
        .map_err(IntoResponse::into_response)?;

    if !state.roles.is_empty() && !state.roles.contains(&session.user_role) {
        let required = state
            .roles
            .iter()
            .map(UserRole::code)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(AuthError::RoleRequired(required).into_response());
    }

    req.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        role: session.user_role,
        session_id: session.session_id,
    });

    Ok(next.run(req).await)
}
