//! Face Check Use Case
//!
//! Compares a live capture against the worker's onboarding selfie through
//! the external face service and records the result on the officer's
//! pending verification record.

use std::sync::Arc;

use kernel::id::{UserId, WorkerId};
use serde_json::json;

use crate::application::config::WorkforceConfig;
use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::verification_record::VerificationRecord;
use crate::domain::gateway::{FaceMatcher, MediaStore};
use crate::domain::repository::{OfficerDirectory, VerificationRepository, WorkerRepository};
use crate::domain::services::decode_image;
use crate::error::{WorkforceError, WorkforceResult};

pub struct FaceCheckInput {
    pub worker_id: WorkerId,
    /// Base64 capture, optionally as a data URI
    pub live_face_image: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCheckOutput {
    pub match_score: f64,
    pub is_match: bool,
    pub liveness_detected: bool,
    pub confidence: f64,
}

pub struct FaceCheckUseCase<R, M, F>
where
    R: WorkerRepository + OfficerDirectory + VerificationRepository,
    M: MediaStore,
    F: FaceMatcher,
{
    repo: Arc<R>,
    media: Arc<M>,
    /// `None` when no face service is configured
    matcher: Option<Arc<F>>,
    config: Arc<WorkforceConfig>,
}

impl<R, M, F> FaceCheckUseCase<R, M, F>
where
    R: WorkerRepository + OfficerDirectory + VerificationRepository,
    M: MediaStore,
    F: FaceMatcher,
{
    pub fn new(
        repo: Arc<R>,
        media: Arc<M>,
        matcher: Option<Arc<F>>,
        config: Arc<WorkforceConfig>,
    ) -> Self {
        Self {
            repo,
            media,
            matcher,
            config,
        }
    }

    pub async fn execute(
        &self,
        officer_user: &UserId,
        input: FaceCheckInput,
    ) -> WorkforceResult<FaceCheckOutput> {
        let officer = self
            .repo
            .find_officer(officer_user)
            .await?
            .ok_or(WorkforceError::OfficerProfileMissing)?;
        let worker = self
            .repo
            .find_worker(&input.worker_id)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)?;
        let selfie_ref = worker
            .selfie_ref
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(WorkforceError::SelfieMissing)?;
        let matcher = self
            .matcher
            .as_ref()
            .ok_or(WorkforceError::FaceServiceUnavailable)?;

        let live = decode_image(&input.live_face_image, self.config.max_image_bytes)?;
        let reference = self.media.load(selfie_ref).await?;
        let comparison = matcher.compare(&reference, &live).await?;

        let liveness_detected = comparison.liveness_confidence > self.config.liveness_threshold;
        let output = if liveness_detected {
            FaceCheckOutput {
                match_score: comparison.similarity,
                is_match: comparison.similarity >= self.config.face_match_threshold,
                liveness_detected,
                confidence: comparison.liveness_confidence,
            }
        } else {
            // a capture that is not live never counts as a match
            FaceCheckOutput {
                match_score: 0.0,
                is_match: false,
                liveness_detected: false,
                confidence: comparison.liveness_confidence,
            }
        };

        let mut record = match self
            .repo
            .find_pending_record(&worker.worker_id, &officer.officer_id)
            .await?
        {
            Some(record) => record,
            None => VerificationRecord::pending(worker.worker_id, officer.officer_id),
        };
        record.record_face_check(output.match_score, output.liveness_detected);

        let audit = AuditEntry::new(
            Some(*officer_user),
            AuditEntry::FACE_VERIFICATION,
            "worker",
            worker.worker_id,
            json!({
                "matchScore": output.match_score,
                "isMatch": output.is_match,
                "livenessDetected": output.liveness_detected,
                "verificationId": record.verification_id.to_string(),
            }),
        );
        self.repo.save_face_check(&record, &audit).await?;

        tracing::info!(
            worker_id = %worker.worker_id,
            officer = %officer.badge_number,
            match_score = output.match_score,
            is_match = output.is_match,
            liveness = output.liveness_detected,
            "Face check recorded"
        );

        Ok(output)
    }
}
