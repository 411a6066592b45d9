//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, role middleware
//!
//! ## Features
//! - Sign-up for workers and police officers (officer profile provisioned)
//! - Login by email or mobile number with password
//! - Server-side sessions behind an HMAC-signed cookie or bearer token
//! - Role guard middleware that exposes [`CurrentUser`] to other crates
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Sessions bound to client fingerprint (User-Agent), 24 hour lifetime
//! - Five consecutive failed logins lock the account for 15 minutes

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::AuthStore;
pub use domain::value_object::{mobile::Mobile, user_role::UserRole};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthMiddlewareState, CurrentUser, require_auth_session};
pub use presentation::router::{auth_router, auth_router_generic};
