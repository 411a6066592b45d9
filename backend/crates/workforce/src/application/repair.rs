//! Repair Passes
//!
//! One-shot corrections of identifier and QR fields, run from the `repair`
//! binary. Every pass is idempotent.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::WorkforceConfig;
use crate::application::credential::CredentialIssuer;
use crate::domain::entity::worker::Worker;
use crate::domain::gateway::MediaStore;
use crate::domain::repository::{RepairRepository, VerificationRepository};
use crate::error::WorkforceResult;

/// Rows touched by each pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub cleared: u64,
    pub expired: u64,
    pub backfilled: u64,
    pub regenerated: u64,
    /// Workers whose QR code could not be written
    pub failed: u64,
}

pub struct RepairUseCase<R, M>
where
    R: RepairRepository + VerificationRepository,
    M: MediaStore,
{
    repo: Arc<R>,
    issuer: CredentialIssuer<M>,
}

impl<R, M> RepairUseCase<R, M>
where
    R: RepairRepository + VerificationRepository,
    M: MediaStore,
{
    pub fn new(repo: Arc<R>, media: Arc<M>, config: Arc<WorkforceConfig>) -> Self {
        Self {
            repo,
            issuer: CredentialIssuer::new(media, config),
        }
    }

    /// Null identifier and QR fields on every worker that is not verified
    pub async fn clear_unverified(&self) -> WorkforceResult<RepairReport> {
        let cleared = self.repo.clear_unverified_credentials().await?;
        tracing::info!(cleared, "Cleared credentials of unverified workers");
        Ok(RepairReport {
            cleared,
            ..Default::default()
        })
    }

    /// QR code and endpoint for verified workers that have none
    pub async fn backfill_qr(&self) -> WorkforceResult<RepairReport> {
        let workers = self.repo.verified_with_identifier(true).await?;
        let (backfilled, failed) = self.rewrite(&workers).await?;
        tracing::info!(backfilled, failed, "Backfilled missing QR codes");
        Ok(RepairReport {
            backfilled,
            failed,
            ..Default::default()
        })
    }

    /// Rewrite every verified worker's QR code under the current base URL
    pub async fn regenerate_qr(&self) -> WorkforceResult<RepairReport> {
        let workers = self.repo.verified_with_identifier(false).await?;
        let (regenerated, failed) = self.rewrite(&workers).await?;
        tracing::info!(regenerated, failed, "Regenerated QR codes");
        Ok(RepairReport {
            regenerated,
            failed,
            ..Default::default()
        })
    }

    /// Expire workers whose latest approval has lapsed
    pub async fn expire_lapsed(&self) -> WorkforceResult<RepairReport> {
        let expired = self.repo.expire_lapsed(Utc::now()).await?;
        tracing::info!(expired, "Expired lapsed approvals");
        Ok(RepairReport {
            expired,
            ..Default::default()
        })
    }

    /// clear-unverified, then expire-lapsed, then backfill-qr
    pub async fn all(&self) -> WorkforceResult<RepairReport> {
        let cleared = self.clear_unverified().await?;
        let expired = self.expire_lapsed().await?;
        let backfilled = self.backfill_qr().await?;
        Ok(RepairReport {
            cleared: cleared.cleared,
            expired: expired.expired,
            backfilled: backfilled.backfilled,
            regenerated: 0,
            failed: backfilled.failed,
        })
    }

    /// Render and store a fresh credential for each worker
    ///
    /// A worker that fails to render is logged and skipped; database errors
    /// abort the pass.
    async fn rewrite(&self, workers: &[Worker]) -> WorkforceResult<(u64, u64)> {
        let mut written = 0;
        let mut failed = 0;
        for worker in workers {
            let Some(identifier) = worker.official_identifier() else {
                continue;
            };
            let credential = match self.issuer.render(identifier).await {
                Ok(credential) => credential,
                Err(err) => {
                    tracing::error!(worker_id = %worker.worker_id, error = %err, "QR rendering failed");
                    failed += 1;
                    continue;
                }
            };
            if self
                .repo
                .replace_credential(&worker.worker_id, &credential, None)
                .await?
            {
                written += 1;
            }
        }
        Ok((written, failed))
    }
}
