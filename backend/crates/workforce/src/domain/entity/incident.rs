use chrono::{DateTime, Utc};
use kernel::id::{IncidentId, OfficerId, WorkerId};

use crate::domain::entity::complaint::case_number;
use crate::domain::value_object::severity::Severity;

/// Police log entry against a worker
#[derive(Debug, Clone)]
pub struct Incident {
    pub incident_id: IncidentId,
    /// `INC-{year}-{mmddHHMMSS}`
    pub incident_number: String,
    pub worker_id: WorkerId,
    pub officer_id: OfficerId,
    pub title: String,
    pub description: String,
    pub incident_type: String,
    pub severity: Severity,
    pub incident_date: DateTime<Utc>,
    pub location: Option<String>,
    pub action_taken: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New incident fields supplied by the officer
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub title: String,
    pub description: String,
    pub incident_type: String,
    pub severity: Severity,
    pub incident_date: DateTime<Utc>,
    pub location: Option<String>,
    pub action_taken: Option<String>,
}

impl Incident {
    pub fn log(worker_id: WorkerId, officer_id: OfficerId, report: IncidentReport) -> Self {
        let now = Utc::now();
        Self {
            incident_id: IncidentId::new(),
            incident_number: case_number("INC", now),
            worker_id,
            officer_id,
            title: report.title,
            description: report.description,
            incident_type: report.incident_type,
            severity: report.severity,
            incident_date: report.incident_date,
            location: report.location,
            action_taken: report.action_taken,
            created_at: now,
        }
    }

    pub fn risk_increment(&self) -> i32 {
        self.severity.risk_increment()
    }
}

/// Incident as listed to officers, with the worker it concerns
#[derive(Debug, Clone)]
pub struct IncidentListing {
    pub incident: Incident,
    pub worker_name: Option<String>,
    pub worker_identifier: Option<String>,
}
