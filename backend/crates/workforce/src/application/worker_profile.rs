//! Worker Profile Use Case
//!
//! What a signed-in worker sees about their own application.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::verification_record::VerificationRecord;
use crate::domain::entity::worker::Worker;
use crate::domain::repository::{VerificationRepository, WorkerRepository};
use crate::domain::value_object::status::VerificationStatus;
use crate::error::WorkforceResult;

/// Verification progress of the worker's application
#[derive(Debug, Clone)]
pub struct VerificationStatusOutput {
    pub worker: Worker,
    /// Most recent decision, if an officer has decided
    pub latest_decision: Option<VerificationRecord>,
}

pub struct WorkerProfileUseCase<R>
where
    R: WorkerRepository + VerificationRepository,
{
    repo: Arc<R>,
}

impl<R> WorkerProfileUseCase<R>
where
    R: WorkerRepository + VerificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The worker, or `None` before onboarding step 1
    pub async fn profile(&self, user_id: &UserId) -> WorkforceResult<Option<Worker>> {
        self.repo.find_worker_by_user(user_id).await
    }

    pub async fn verification_status(
        &self,
        user_id: &UserId,
    ) -> WorkforceResult<Option<VerificationStatusOutput>> {
        let Some(worker) = self.repo.find_worker_by_user(user_id).await? else {
            return Ok(None);
        };

        // face checks leave pending records; only decisions count here
        let latest_decision = self
            .repo
            .records_for_worker(&worker.worker_id)
            .await?
            .into_iter()
            .find(|r| r.status != VerificationStatus::Pending);

        Ok(Some(VerificationStatusOutput {
            worker,
            latest_decision,
        }))
    }
}
