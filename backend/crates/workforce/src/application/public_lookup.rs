//! Public Lookup Use Case
//!
//! Lets anyone confirm that a worker is police verified. Only verified
//! workers holding an identifier are ever returned; every other subject,
//! including pending applicants, is reported as not found.

use std::sync::Arc;

use auth::Mobile;
use chrono::{DateTime, Utc};

use crate::application::config::WorkforceConfig;
use crate::domain::entity::worker::Worker;
use crate::domain::repository::{LookupRateLimitRepository, VerificationRepository, WorkerRepository};
use crate::domain::services::identifier_from_qr;
use crate::domain::value_object::status::{VerificationStatus, WorkerStatus};
use crate::domain::value_object::worker_category::WorkerCategory;
use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::{WorkforceError, WorkforceResult};

/// How the caller names the worker
#[derive(Debug, Clone)]
pub enum LookupQuery {
    Identifier(String),
    Mobile(String),
    /// Raw text of a scanned QR code
    QrData(String),
}

impl LookupQuery {
    /// First non-blank of identifier, mobile and QR data
    pub fn from_parts(
        identifier: Option<String>,
        mobile: Option<String>,
        qr_data: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        present(identifier)
            .map(LookupQuery::Identifier)
            .or_else(|| present(mobile).map(LookupQuery::Mobile))
            .or_else(|| present(qr_data).map(LookupQuery::QrData))
    }
}

/// Non-sensitive view of a verified worker
#[derive(Debug, Clone)]
pub struct PublicWorker {
    pub identifier: WorkerIdentifier,
    pub full_name: String,
    pub photo_ref: Option<String>,
    pub category: Option<WorkerCategory>,
    pub verification_status: VerificationStatus,
    pub police_verified: bool,
    pub station_name: Option<String>,
    pub last_verified_at: Option<DateTime<Utc>>,
    pub risk_score: i32,
    pub is_active: bool,
}

pub struct PublicLookupUseCase<R>
where
    R: WorkerRepository + VerificationRepository + LookupRateLimitRepository,
{
    repo: Arc<R>,
    config: Arc<WorkforceConfig>,
}

impl<R> PublicLookupUseCase<R>
where
    R: WorkerRepository + VerificationRepository + LookupRateLimitRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<WorkforceConfig>) -> Self {
        Self { repo, config }
    }

    /// Count the request against the client's window
    pub async fn throttle(&self, client_key: &[u8]) -> WorkforceResult<()> {
        let limit = &self.config.lookup_rate_limit;
        let now_ms = Utc::now().timestamp_millis();
        let window_start = limit.window_start_ms(now_ms);

        let count = self.repo.hit(client_key, window_start).await?;
        let result = limit.decide(count, window_start);
        if !result.allowed {
            return Err(WorkforceError::RateLimited {
                retry_after_secs: result.retry_after_secs(now_ms),
            });
        }
        Ok(())
    }

    /// Remove counters of windows that have already closed
    pub async fn purge_expired_windows(&self) -> WorkforceResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let window_start = self.config.lookup_rate_limit.window_start_ms(now_ms);
        self.repo.purge_windows_before(window_start).await
    }

    pub async fn execute(
        &self,
        client_key: &[u8],
        query: LookupQuery,
    ) -> WorkforceResult<Option<PublicWorker>> {
        self.throttle(client_key).await?;

        let worker = match &query {
            LookupQuery::Identifier(raw) => match WorkerIdentifier::parse(raw) {
                Some(identifier) => self.repo.find_worker_by_identifier(&identifier).await?,
                None => None,
            },
            LookupQuery::Mobile(raw) => match Mobile::new(raw) {
                Ok(mobile) => self.repo.find_worker_by_mobile(mobile.as_str()).await?,
                Err(_) => None,
            },
            LookupQuery::QrData(raw) => match identifier_from_qr(raw) {
                Some(identifier) => self.repo.find_worker_by_identifier(&identifier).await?,
                None => None,
            },
        };

        let Some(worker) = worker.filter(Worker::is_publicly_verifiable) else {
            tracing::debug!(query = kind(&query), "Public lookup found no verified worker");
            return Ok(None);
        };

        let approval = self.repo.latest_approval(&worker.worker_id).await?;
        let (station_name, last_verified_at) = approval
            .map(|a| (a.station_name, a.verified_at))
            .unwrap_or_default();

        tracing::info!(worker_id = %worker.worker_id, "Public lookup served");
        Ok(project(worker, station_name, last_verified_at))
    }
}

fn project(
    worker: Worker,
    station_name: Option<String>,
    last_verified_at: Option<DateTime<Utc>>,
) -> Option<PublicWorker> {
    let identifier = worker.official_identifier()?.clone();
    Some(PublicWorker {
        identifier,
        full_name: worker.owner.full_name,
        photo_ref: worker.selfie_ref,
        category: worker.category,
        verification_status: worker.verification_status,
        police_verified: true,
        station_name,
        last_verified_at: last_verified_at.or(Some(worker.updated_at)),
        risk_score: worker.risk_score,
        is_active: worker.status == WorkerStatus::Active,
    })
}

/// Query kind for logs; the value itself stays out of them
fn kind(query: &LookupQuery) -> &'static str {
    match query {
        LookupQuery::Identifier(_) => "identifier",
        LookupQuery::Mobile(_) => "mobile",
        LookupQuery::QrData(_) => "qr_data",
    }
}
