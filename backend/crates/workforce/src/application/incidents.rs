//! Incident Use Cases
//!
//! Police log entries against workers; each raises the worker's risk score
//! by the incident's severity.

use std::sync::Arc;

use kernel::id::{UserId, WorkerId};
use serde_json::json;

use crate::domain::entity::audit_entry::AuditEntry;
use crate::domain::entity::incident::{Incident, IncidentListing, IncidentReport};
use crate::domain::entity::worker::Worker;
use crate::domain::repository::{IncidentRepository, OfficerDirectory, WorkerRepository};
use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::{WorkforceError, WorkforceResult};

const RECENT_INCIDENTS: i64 = 100;

pub struct LogIncidentInput {
    /// Internal id or official identifier
    pub worker: String,
    pub report: IncidentReport,
}

pub struct IncidentUseCase<R>
where
    R: WorkerRepository + OfficerDirectory + IncidentRepository,
{
    repo: Arc<R>,
}

impl<R> IncidentUseCase<R>
where
    R: WorkerRepository + OfficerDirectory + IncidentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn log(
        &self,
        officer_user: &UserId,
        input: LogIncidentInput,
    ) -> WorkforceResult<Incident> {
        if input.report.title.trim().is_empty() || input.report.description.trim().is_empty() {
            return Err(WorkforceError::InvalidInput(
                "Incident title and description are required".to_string(),
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

        let incident = Incident::log(worker.worker_id, officer.officer_id, input.report);
        let audit = AuditEntry::new(
            Some(*officer_user),
            AuditEntry::INCIDENT_LOGGED,
            "incident",
            incident.incident_id,
            json!({
                "incidentNumber": incident.incident_number,
                "workerId": worker.worker_id.to_string(),
                "severity": incident.severity.as_str(),
                "riskIncrement": incident.risk_increment(),
            }),
        );
        self.repo.log_incident(&incident, &audit).await?;

        tracing::info!(
            incident = %incident.incident_number,
            worker_id = %worker.worker_id,
            severity = incident.severity.as_str(),
            "Incident logged"
        );
        Ok(incident)
    }

    pub async fn recent(&self) -> WorkforceResult<Vec<IncidentListing>> {
        self.repo.recent_incidents(RECENT_INCIDENTS).await
    }
}

/// Worker named by internal id or by official identifier
pub(crate) async fn resolve_worker<R: WorkerRepository>(
    repo: &R,
    raw: &str,
) -> WorkforceResult<Option<Worker>> {
    let raw = raw.trim();
    if let Ok(worker_id) = raw.parse::<WorkerId>() {
        return repo.find_worker(&worker_id).await;
    }
    match WorkerIdentifier::parse(raw) {
        Some(identifier) => repo.find_worker_by_identifier(&identifier).await,
        None => Ok(None),
    }
}
