//! Auth Error Types
//!
//! Auth-specific variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed field in a request (name, email, mobile)
    #[error("{0}")]
    InvalidInput(String),

    /// Neither email nor mobile was given at sign-up
    #[error("Email or mobile number required")]
    MissingContact,

    /// Role that cannot be chosen at sign-up
    #[error("Role cannot be used for sign-up: {0}")]
    InvalidRole(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Mobile number already registered")]
    MobileTaken,

    /// Unknown account or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Too many failed attempts
    #[error("Account is temporarily locked")]
    AccountLocked,

    #[error("Account is disabled")]
    AccountDisabled,

    /// Session missing, expired, forged, or bound to another client
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Authenticated, but the role may not use this route
    #[error("This action requires the {0} role")]
    RoleRequired(String),

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_)
            | AuthError::MissingContact
            | AuthError::InvalidRole(_)
            | AuthError::MissingHeader(_)
            | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken | AuthError::MobileTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::AccountLocked => ErrorKind::Locked,
            AuthError::AccountDisabled | AuthError::RoleRequired(_) => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            AuthError::SessionInvalid => {
                AppError::unauthorized(self.to_string()).with_action("Log in again")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::RoleRequired(role) => {
                tracing::warn!(required = %role, "Route refused for role");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::InvalidInput(err.message().to_string())
        }
    }
}

impl From<platform::client::FingerprintError> for AuthError {
    fn from(err: platform::client::FingerprintError) -> Self {
        match err {
            platform::client::FingerprintError::MissingHeader(header) => {
                AuthError::MissingHeader(header)
            }
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::PasswordValidation(err.to_string())
    }
}
