//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthConfig, PgAuthRepository, auth_router, domain::repository::AuthSessionRepository};
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workforce::{
    FsMediaStore, HttpFaceMatcher, PgWorkforceRepository, PublicLookupUseCase, RouteGuard,
    WorkforceConfig, workforce_router,
};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,workforce=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("connecting to database")?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("running migrations")?;

    tracing::info!("Migrations completed");

    // Startup cleanup: errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").context("SESSION_SECRET must be set in production")?;
        let secret = platform::crypto::secret_from_base64(&secret_b64)
            .context("SESSION_SECRET must be 32 bytes of base64")?;
        AuthConfig {
            session_secret: secret,
            password_pepper: env::var("PASSWORD_PEPPER").ok().map(String::into_bytes),
            ..AuthConfig::default()
        }
    };

    // Workforce configuration
    let mut workforce_config = if cfg!(debug_assertions) {
        WorkforceConfig::development()
    } else {
        WorkforceConfig::default()
    };
    if let Ok(base) = env::var("FRONTEND_BASE_URL") {
        workforce_config = workforce_config.with_frontend_base_url(base);
    }
    if let Ok(dir) = env::var("UPLOAD_DIR") {
        workforce_config.upload_dir = dir.into();
    }
    tracing::info!(
        frontend = %workforce_config.frontend_base_url,
        uploads = %workforce_config.upload_dir.display(),
        "Workforce configured"
    );

    // Lookup counters of closed windows, for clients that never came back
    let lookup = PublicLookupUseCase::new(
        Arc::new(PgWorkforceRepository::new(pool.clone())),
        Arc::new(workforce_config.clone()),
    );
    match lookup.purge_expired_windows().await {
        Ok(rows) => {
            tracing::info!(rows_deleted = rows, "Lookup rate limit cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Lookup rate limit cleanup failed, continuing anyway");
        }
    }

    let media = FsMediaStore::new(workforce_config.upload_dir.clone());
    let face = match env::var("FACE_SERVICE_URL") {
        Ok(url) if !url.trim().is_empty() => {
            tracing::info!(url = %url, "Face matching service enabled");
            Some(HttpFaceMatcher::new(url, env::var("FACE_SERVICE_API_KEY").ok()))
        }
        _ => {
            tracing::warn!("FACE_SERVICE_URL not set, face checks are disabled");
            None
        }
    };
    let uploads = ServeDir::new(workforce_config.upload_dir.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let guard = RouteGuard {
        repo: auth_repo.clone(),
        config: auth_config.clone(),
    };
    let app = Router::new()
        .nest(
            "/api",
            workforce_router(
                PgWorkforceRepository::new(pool.clone()),
                media,
                face,
                guard,
                workforce_config,
            )
            .nest("/auth", auth_router(auth_repo, auth_config))
            .route("/health", get(|| async { Json(serde_json::json!({ "status": "ok" })) })),
        )
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be host:port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
