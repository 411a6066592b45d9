//! Application Configuration
//!
//! Configuration for the Workforce application layer.

use std::path::PathBuf;

use platform::rate_limit::RateLimitConfig;

use crate::domain::services;
use crate::domain::value_object::worker_identifier::WorkerIdentifier;

/// Workforce application configuration
#[derive(Debug, Clone)]
pub struct WorkforceConfig {
    /// Base of QR payloads and verification endpoints, without trailing slash
    pub frontend_base_url: String,
    /// Root of stored selfies and QR images
    pub upload_dir: PathBuf,
    /// Public lookup throttle per client
    pub lookup_rate_limit: RateLimitConfig,
    /// Similarity at or above which faces match (0-100)
    pub face_match_threshold: f64,
    /// Live-image confidence above which the subject counts as live (0-100)
    pub liveness_threshold: f64,
    /// Largest accepted decoded image
    pub max_image_bytes: usize,
    /// Attempts to find a free identifier sequence number
    pub max_issue_attempts: u32,
    /// Lifetime of an approval
    pub approval_validity_days: i64,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            frontend_base_url: "https://jansuraksha.gov.in".to_string(),
            upload_dir: PathBuf::from("uploads"),
            lookup_rate_limit: RateLimitConfig::default(),
            face_match_threshold: 70.0,
            liveness_threshold: 90.0,
            max_image_bytes: 5 * 1024 * 1024,
            max_issue_attempts: 10,
            approval_validity_days: 365,
        }
    }
}

impl WorkforceConfig {
    /// Local frontend and a generous lookup limit
    pub fn development() -> Self {
        Self {
            frontend_base_url: "http://localhost:5173".to_string(),
            lookup_rate_limit: RateLimitConfig::new(300, 60),
            ..Default::default()
        }
    }

    /// Replace the frontend base, dropping any trailing slash
    pub fn with_frontend_base_url(mut self, base: impl AsRef<str>) -> Self {
        self.frontend_base_url = base.as_ref().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn qr_payload(&self, identifier: &WorkerIdentifier) -> String {
        services::qr_payload(&self.frontend_base_url, identifier)
    }

    pub fn verification_endpoint(&self, identifier: &WorkerIdentifier) -> String {
        services::verification_endpoint(&self.frontend_base_url, identifier)
    }
}
