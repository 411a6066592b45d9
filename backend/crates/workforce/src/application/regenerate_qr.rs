//! Regenerate QR Use Case
//!
//! Re-renders a verified worker's QR code under the current base URL.

use std::sync::Arc;

use kernel::id::{UserId, WorkerId};
use serde_json::json;

use crate::application::config::WorkforceConfig;
use crate::application::credential::CredentialIssuer;
use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::worker::IssuedCredential;
use crate::domain::gateway::MediaStore;
use crate::domain::repository::{VerificationRepository, WorkerRepository};
use crate::error::{WorkforceError, WorkforceResult};

pub struct RegenerateQrUseCase<R, M>
where
    R: WorkerRepository + VerificationRepository,
    M: MediaStore,
{
    repo: Arc<R>,
    issuer: CredentialIssuer<M>,
}

impl<R, M> RegenerateQrUseCase<R, M>
where
    R: WorkerRepository + VerificationRepository,
    M: MediaStore,
{
    pub fn new(repo: Arc<R>, media: Arc<M>, config: Arc<WorkforceConfig>) -> Self {
        Self {
            repo,
            issuer: CredentialIssuer::new(media, config),
        }
    }

    pub async fn execute(
        &self,
        officer_user: &UserId,
        worker_id: &WorkerId,
    ) -> WorkforceResult<IssuedCredential> {
        let worker = self
            .repo
            .find_worker(worker_id)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)?;
        let identifier = worker
            .official_identifier()
            .cloned()
            .ok_or(WorkforceError::NotVerified)?;

        let credential = self.issuer.render(&identifier).await?;
        let audit = AuditEntry::new(
            Some(*officer_user),
            AuditEntry::QR_REGENERATED,
            "worker",
            worker.worker_id,
            json!({ "workerIdentifier": identifier.as_str(), "qrPayload": credential.qr_payload }),
        );

        // the worker may have been rejected since it was read
        if !self
            .repo
            .replace_credential(&worker.worker_id, &credential, Some(&audit))
            .await?
        {
            return Err(WorkforceError::NotVerified);
        }

        tracing::info!(worker_id = %worker.worker_id, identifier = %identifier, "QR code regenerated");
        Ok(credential)
    }
}
