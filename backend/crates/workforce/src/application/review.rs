//! Review Use Case
//!
//! Read side of police review: the queue, one worker's full record,
//! search, dashboard counts and the officer's own profile.

use std::sync::Arc;

use auth::domain::entity::police_officer::PoliceOfficer;
use kernel::id::{UserId, WorkerId};

use crate::domain::entity::complaint::Complaint;
use crate::domain::entity::verification_record::VerificationRecord;
use crate::domain::entity::worker::Worker;
use crate::domain::repository::{
    ComplaintRepository, OfficerActivity, OfficerDirectory, ReviewStats, VerificationRepository,
    WorkerRepository,
};
use crate::domain::value_object::status::VerificationStatus;
use crate::error::{WorkforceError, WorkforceResult};

const SEARCH_LIMIT: i64 = 50;
const RECENT_DECISIONS: i64 = 10;

/// Review label of a submitted worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Approved,
    Rejected,
    Pending,
}

impl QueueStatus {
    pub fn of(worker: &Worker) -> Self {
        match worker.verification_status {
            VerificationStatus::Verified => QueueStatus::Approved,
            VerificationStatus::Rejected => QueueStatus::Rejected,
            _ => QueueStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Approved => "approved",
            QueueStatus::Rejected => "rejected",
            QueueStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub worker: Worker,
    pub status: QueueStatus,
}

/// Everything an officer needs to decide on one worker
#[derive(Debug, Clone)]
pub struct WorkerDetailOutput {
    pub worker: Worker,
    /// Newest first
    pub records: Vec<VerificationRecord>,
    pub complaints: Vec<Complaint>,
}

#[derive(Debug, Clone)]
pub struct OfficerProfileOutput {
    pub officer: PoliceOfficer,
    pub activity: OfficerActivity,
}

pub struct ReviewUseCase<R>
where
    R: WorkerRepository + OfficerDirectory + VerificationRepository + ComplaintRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewUseCase<R>
where
    R: WorkerRepository + OfficerDirectory + VerificationRepository + ComplaintRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Submitted workers still waiting for a decision
    pub async fn queue(&self) -> WorkforceResult<Vec<QueueEntry>> {
        let workers = self.repo.review_queue().await?;
        Ok(workers
            .into_iter()
            .map(|worker| QueueEntry {
                status: QueueStatus::of(&worker),
                worker,
            })
            .collect())
    }

    pub async fn detail(&self, worker_id: &WorkerId) -> WorkforceResult<WorkerDetailOutput> {
        let worker = self
            .repo
            .find_worker(worker_id)
            .await?
            .ok_or(WorkforceError::WorkerNotFound)?;

        let mut records = self.repo.records_for_worker(worker_id).await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let complaints = self.repo.complaints_for_worker(worker_id).await?;

        Ok(WorkerDetailOutput {
            worker,
            records,
            complaints,
        })
    }

    /// Blank queries return nothing rather than the whole table
    pub async fn search(&self, query: &str) -> WorkforceResult<Vec<Worker>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.search_workers(query, SEARCH_LIMIT).await
    }

    pub async fn stats(&self) -> WorkforceResult<ReviewStats> {
        self.repo.review_stats().await
    }

    pub async fn officer_profile(&self, user_id: &UserId) -> WorkforceResult<OfficerProfileOutput> {
        let officer = self
            .repo
            .find_officer(user_id)
            .await?
            .ok_or(WorkforceError::OfficerProfileMissing)?;
        let activity = self
            .repo
            .officer_activity(&officer.officer_id, RECENT_DECISIONS)
            .await?;

        Ok(OfficerProfileOutput { officer, activity })
    }
}
