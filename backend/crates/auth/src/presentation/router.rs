//! Auth Router

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth_session};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AuthStore,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };
    let guard = AuthMiddlewareState::new(state.repo.clone(), state.config.clone());

    let protected = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            require_auth_session(guard.clone(), req, next)
        }));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .merge(protected)
        .with_state(state)
}
