//! Admin Use Cases
//!
//! Audit trail reads, the global blacklist and status overrides. Every
//! change is written together with its audit entry.

use std::sync::Arc;

use kernel::id::UserId;
use serde_json::json;

use crate::application::incidents::resolve_worker;
use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::worker::Worker;
use crate::domain::repository::{AdminRepository, AuditPage, WorkerRepository};
use crate::domain::value_object::status::WorkerStatus;
use crate::error::{WorkforceError, WorkforceResult};

const MAX_PAGE: i64 = 500;

pub struct StatusOverrideInput {
    /// Official identifier; an internal id is accepted too
    pub worker: String,
    pub status: String,
    pub reason: Option<String>,
}

pub struct AdminUseCase<R>
where
    R: WorkerRepository + AdminRepository,
{
    repo: Arc<R>,
}

impl<R> AdminUseCase<R>
where
    R: WorkerRepository + AdminRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Newest entries first; `limit` is clamped to 1..=500
    pub async fn audit_log(&self, skip: i64, limit: i64) -> WorkforceResult<AuditPage> {
        self.repo
            .audit_log(skip.max(0), limit.clamp(1, MAX_PAGE))
            .await
    }

    pub async fn blacklist(
        &self,
        admin_user: &UserId,
        worker: &str,
        reason: &str,
    ) -> WorkforceResult<Worker> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkforceError::InvalidInput(
                "A blacklist reason is required".to_string(),
            ));
        }
        let worker = self.find(worker).await?;

        let audit = AuditEntry::new(
            Some(*admin_user),
            AuditEntry::WORKER_BLACKLISTED,
            "worker",
            worker.worker_id,
            json!({ "reason": reason }),
        );
        self.repo
            .blacklist_worker(&worker.worker_id, reason, &audit)
            .await?;

        tracing::warn!(worker_id = %worker.worker_id, "Worker blacklisted");
        self.repo
            .find_worker(&worker.worker_id)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)
    }

    /// Set the operational status directly. Blacklisted workers stay
    /// blocked and only verified workers may be made active.
    pub async fn override_status(
        &self,
        admin_user: &UserId,
        input: StatusOverrideInput,
    ) -> WorkforceResult<WorkerStatus> {
        let status = WorkerStatus::from_code(input.status.trim()).ok_or_else(|| {
            WorkforceError::InvalidInput(format!("Unknown worker status: {}", input.status))
        })?;
        let worker = self.find(&input.worker).await?;
        if worker.is_blacklisted() {
            return Err(WorkforceError::WorkerBlacklisted);
        }
        if status == WorkerStatus::Active && !worker.is_verified() {
            return Err(WorkforceError::NotVerified);
        }

        let reason = input
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        let audit = AuditEntry::new(
            Some(*admin_user),
            AuditEntry::WORKER_STATUS_OVERRIDE,
            "worker",
            worker.worker_id,
            json!({
                "from": worker.status.code(),
                "status": status.code(),
                "reason": reason,
            }),
        );
        self.repo
            .set_worker_status(&worker.worker_id, status, &audit)
            .await?;

        tracing::info!(
            worker_id = %worker.worker_id,
            from = %worker.status,
            status = %status,
            "Worker status overridden"
        );
        Ok(status)
    }

    async fn find(&self, worker: &str) -> WorkforceResult<Worker> {
        resolve_worker(self.repo.as_ref(), worker)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)
    }
}
