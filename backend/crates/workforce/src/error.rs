//! Workforce Error Types
//!
//! Workforce-specific variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::services::ImageDecodeError;

/// Workforce-specific result type alias
pub type WorkforceResult<T> = Result<T, WorkforceError>;

#[derive(Debug, Error)]
pub enum WorkforceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageDecodeError),

    #[error("Decision must be 'verified' or 'rejected', got '{0}'")]
    InvalidDecision(String),

    #[error("Missing required data from previous steps: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Consent is required to submit the application")]
    ConsentRequired,

    #[error("Worker selfie not available")]
    SelfieMissing,

    /// Onboarding step submitted out of order
    #[error("Complete step {0} first")]
    StepOutOfOrder(u8),

    #[error("Application is already submitted and pending police verification")]
    AlreadySubmitted,

    #[error("Profile is already verified and cannot be re-submitted")]
    AlreadyVerified,

    #[error("Worker has not completed onboarding")]
    OnboardingIncomplete,

    #[error("Worker must be verified and hold an identifier")]
    NotVerified,

    /// A concurrent decision changed the worker's identifier first
    #[error("Worker identifier was already issued by another decision")]
    IdentifierAlreadyIssued,

    /// Identifier sequence number claimed by another worker; retryable
    #[error("Identifier sequence number already taken")]
    SequenceTaken,

    #[error("Could not allocate a worker identifier after {0} attempts")]
    SequenceExhausted(u32),

    #[error("Mobile number already registered")]
    MobileTaken,

    /// Worker row changed between read and write
    #[error("Application was changed by another request, reload and try again")]
    StaleWorker,

    #[error("Worker not found")]
    WorkerNotFound,

    #[error("Worker is blacklisted")]
    WorkerBlacklisted,

    /// Police account without an officer profile
    #[error("Police officer profile not found")]
    OfficerProfileMissing,

    #[error("Too many lookup requests")]
    RateLimited { retry_after_secs: u64 },

    #[error("Face matching service is not configured")]
    FaceServiceUnavailable,

    #[error("Face matching failed: {0}")]
    FaceService(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorkforceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkforceError::InvalidInput(_)
            | WorkforceError::InvalidImage(_)
            | WorkforceError::InvalidDecision(_)
            | WorkforceError::MissingFields(_)
            | WorkforceError::ConsentRequired
            | WorkforceError::SelfieMissing => ErrorKind::BadRequest,
            WorkforceError::StepOutOfOrder(_)
            | WorkforceError::AlreadySubmitted
            | WorkforceError::AlreadyVerified
            | WorkforceError::OnboardingIncomplete
            | WorkforceError::NotVerified
            | WorkforceError::IdentifierAlreadyIssued
            | WorkforceError::SequenceTaken
            | WorkforceError::SequenceExhausted(_)
            | WorkforceError::MobileTaken
            | WorkforceError::StaleWorker => ErrorKind::Conflict,
            WorkforceError::WorkerNotFound => ErrorKind::NotFound,
            WorkforceError::OfficerProfileMissing | WorkforceError::WorkerBlacklisted => {
                ErrorKind::Forbidden
            }
            WorkforceError::RateLimited { .. } => ErrorKind::TooManyRequests,
            WorkforceError::FaceServiceUnavailable => ErrorKind::ServiceUnavailable,
            WorkforceError::FaceService(_) => ErrorKind::BadGateway,
            WorkforceError::Storage(_)
            | WorkforceError::Database(_)
            | WorkforceError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            WorkforceError::Storage(_)
            | WorkforceError::Database(_)
            | WorkforceError::Internal(_) => AppError::internal("Internal server error"),
            WorkforceError::FaceService(_) => AppError::bad_gateway("Face matching failed"),
            WorkforceError::StepOutOfOrder(_) => {
                AppError::conflict(self.to_string()).with_action("Continue from the earlier step")
            }
            WorkforceError::RateLimited { .. } => {
                AppError::too_many_requests(self.to_string()).with_action("Try again later")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            WorkforceError::Database(e) => {
                tracing::error!(error = %e, "Workforce database error");
            }
            WorkforceError::Storage(msg) => {
                tracing::error!(message = %msg, "Workforce storage error");
            }
            WorkforceError::Internal(msg) => {
                tracing::error!(message = %msg, "Workforce internal error");
            }
            WorkforceError::FaceService(msg) => {
                tracing::error!(message = %msg, "Face matching service failed");
            }
            WorkforceError::IdentifierAlreadyIssued
            | WorkforceError::SequenceTaken
            | WorkforceError::SequenceExhausted(_) => {
                tracing::warn!(error = %self, "Identifier issuance conflict");
            }
            WorkforceError::StaleWorker => {
                tracing::warn!("Onboarding write lost a race with another update");
            }
            WorkforceError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Public lookup rate limit exceeded");
            }
            WorkforceError::OfficerProfileMissing => {
                tracing::warn!("Police account without officer profile");
            }
            _ => {
                tracing::debug!(error = %self, "Workforce error");
            }
        }
    }
}

impl IntoResponse for WorkforceError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = match &self {
            WorkforceError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let mut response = self.to_app_error().into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<AppError> for WorkforceError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            WorkforceError::Internal(err.to_string())
        } else {
            WorkforceError::InvalidInput(err.message().to_string())
        }
    }
}

impl From<platform::qr::QrError> for WorkforceError {
    fn from(err: platform::qr::QrError) -> Self {
        WorkforceError::Internal(err.to_string())
    }
}
