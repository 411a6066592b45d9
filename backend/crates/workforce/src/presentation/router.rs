//! Workforce Router
//!
//! Mounted under `/api`: `/workers` for the worker role, `/police` for the
//! police role, `/admin` for administrators and the public `/verify` lookup.

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    routing::{get, post},
};
use std::sync::Arc;

use auth::domain::repository::AuthSessionRepository;
use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, UserRole, require_auth_session};

use crate::application::config::WorkforceConfig;
use crate::domain::gateway::{FaceMatcher, MediaStore};
use crate::domain::repository::WorkforceStore;
use crate::infra::{FsMediaStore, HttpFaceMatcher, PgWorkforceRepository};
use crate::presentation::handlers::{self, WorkforceAppState};

/// Auth session lookup used to guard the role-restricted routes
pub struct RouteGuard<A>
where
    A: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: A,
    pub config: AuthConfig,
}

/// Create the Workforce router with PostgreSQL and filesystem storage
pub fn workforce_router(
    repo: PgWorkforceRepository,
    media: FsMediaStore,
    face: Option<HttpFaceMatcher>,
    guard: RouteGuard<PgAuthRepository>,
    config: WorkforceConfig,
) -> Router {
    workforce_router_generic(repo, media, face, guard, config)
}

/// Create a generic Workforce router for any storage implementation
pub fn workforce_router_generic<R, M, F, A>(
    repo: R,
    media: M,
    face: Option<F>,
    guard: RouteGuard<A>,
    config: WorkforceConfig,
) -> Router
where
    R: WorkforceStore,
    M: MediaStore + Send + Sync + 'static,
    F: FaceMatcher + Send + Sync + 'static,
    A: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let state = WorkforceAppState {
        repo: Arc::new(repo),
        media: Arc::new(media),
        face: face.map(Arc::new),
        config: Arc::new(config),
    };

    let sessions = AuthMiddlewareState::new(Arc::new(guard.repo), Arc::new(guard.config));
    let worker_guard = sessions.clone().with_roles(&[UserRole::Worker]);
    let police_guard = sessions.clone().with_roles(&[UserRole::Police]);
    let admin_guard = sessions.with_roles(&[UserRole::Admin]);

    let workers = Router::new()
        .route("/onboard/step1", post(handlers::onboard_step1::<R, M, F>))
        .route("/onboard/step2", post(handlers::onboard_step2::<R, M, F>))
        .route("/onboard/step3", post(handlers::onboard_step3::<R, M, F>))
        .route("/onboard/step4", post(handlers::onboard_step4::<R, M, F>))
        .route("/onboard/step5", post(handlers::onboard_step5::<R, M, F>))
        .route("/onboard/step6", post(handlers::onboard_step6::<R, M, F>))
        .route("/onboard/complete", post(handlers::onboard_complete::<R, M, F>))
        .route("/me", get(handlers::worker_me::<R, M, F>))
        .route(
            "/verification/status",
            get(handlers::verification_status::<R, M, F>),
        )
        .route(
            "/onboarding/status",
            get(handlers::onboarding_status::<R, M, F>),
        )
        .route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            require_auth_session(worker_guard.clone(), req, next)
        }));

    let police = Router::new()
        .route(
            "/verification-queue",
            get(handlers::verification_queue::<R, M, F>),
        )
        .route("/workers/by-id/{id}", get(handlers::worker_detail::<R, M, F>))
        .route("/workers/search", get(handlers::search_workers::<R, M, F>))
        .route("/verify-face", post(handlers::verify_face::<R, M, F>))
        .route("/verify", post(handlers::decide::<R, M, F>))
        .route("/regenerate-qr/{id}", post(handlers::regenerate_qr::<R, M, F>))
        .route("/stats", get(handlers::stats::<R, M, F>))
        .route("/me", get(handlers::officer_me::<R, M, F>))
        .route("/incidents", get(handlers::incidents::<R, M, F>))
        .route("/incident", post(handlers::log_incident::<R, M, F>))
        .route("/suspend", post(handlers::suspend::<R, M, F>))
        .route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            require_auth_session(police_guard.clone(), req, next)
        }));

    let admin = Router::new()
        .route("/audit-logs", get(handlers::audit_logs::<R, M, F>))
        .route("/blacklist/{id}", post(handlers::blacklist::<R, M, F>))
        .route("/workers/status", post(handlers::override_status::<R, M, F>))
        .route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            require_auth_session(admin_guard.clone(), req, next)
        }));

    let public = Router::new()
        .route("/worker", post(handlers::lookup::<R, M, F>))
        .route("/worker/{identifier}", get(handlers::lookup_by_path::<R, M, F>))
        .route("/complaints", post(handlers::file_complaint::<R, M, F>));

    Router::new()
        .nest("/workers", workers)
        .nest("/police", police)
        .nest("/admin", admin)
        .nest("/verify", public)
        .with_state(state)
}
