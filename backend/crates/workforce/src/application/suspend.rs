//! Suspend Use Case

use std::sync::Arc;

use kernel::id::UserId;
use serde_json::json;

use crate::application::incidents::resolve_worker;
use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::repository::{OfficerDirectory, WorkerRepository};
use crate::domain::value_object::status::WorkerStatus;
use crate::error::{WorkforceError, WorkforceResult};

pub struct SuspendInput {
    /// Official identifier; an internal id is accepted too
    pub worker: String,
    pub reason: String,
    /// Temporary suspensions can be lifted; otherwise the worker is blocked
    pub temporary: bool,
}

#[derive(Debug, Clone)]
pub struct SuspendOutput {
    pub worker_status: WorkerStatus,
}

pub struct SuspendUseCase<R>
where
    R: WorkerRepository + OfficerDirectory,
{
    repo: Arc<R>,
}

impl<R> SuspendUseCase<R>
where
    R: WorkerRepository + OfficerDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        officer_user: &UserId,
        input: SuspendInput,
    ) -> WorkforceResult<SuspendOutput> {
        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(WorkforceError::InvalidInput(
                "A suspension reason is required".to_string(),
            ));
        }
        let officer = self
            .repo
            .find_officer(officer_user)
            .await?
            .ok_or(WorkforceError::OfficerProfileMissing)?;
        let worker = resolve_worker(self.repo.as_ref(), &input.worker)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)?;
        if worker.is_blacklisted() {
            return Err(WorkforceError::WorkerBlacklisted);
        }

        let status = if input.temporary {
            WorkerStatus::Suspended
        } else {
            WorkerStatus::Blocked
        };
        let audit = AuditEntry::new(
            Some(*officer_user),
            AuditEntry::WORKER_SUSPENDED,
            "worker",
            worker.worker_id,
            json!({
                "reason": reason,
                "temporary": input.temporary,
                "status": status.code(),
                "officer": officer.badge_number,
            }),
        );
        self.repo
            .set_worker_status(&worker.worker_id, status, &audit)
            .await?;

        tracing::warn!(
            worker_id = %worker.worker_id,
            status = %status,
            officer = %officer.badge_number,
            "Worker suspended"
        );
        Ok(SuspendOutput {
            worker_status: status,
        })
    }
}
