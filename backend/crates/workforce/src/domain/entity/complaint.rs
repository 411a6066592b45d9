use chrono::{DateTime, Datelike, Utc};
use kernel::id::{ComplaintId, WorkerId};

use crate::domain::value_object::complaint::{ComplaintCategory, ComplaintStatus};

/// Complaint filed by a citizen against a verified worker
#[derive(Debug, Clone)]
pub struct Complaint {
    pub complaint_id: ComplaintId,
    /// `CMP-{year}-{mmddHHMMSS}`
    pub complaint_number: String,
    pub worker_id: WorkerId,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    pub title: String,
    pub description: String,
    pub complainant_name: Option<String>,
    pub complainant_contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    pub const RISK_INCREMENT: i32 = 10;

    pub fn file(
        worker_id: WorkerId,
        category: ComplaintCategory,
        title: String,
        description: String,
        complainant_name: Option<String>,
        complainant_contact: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            complaint_id: ComplaintId::new(),
            complaint_number: case_number("CMP", now),
            worker_id,
            category,
            status: ComplaintStatus::Open,
            title,
            description,
            complainant_name,
            complainant_contact,
            created_at: now,
        }
    }
}

/// `{prefix}-{year}-{mmddHHMMSS}`
pub fn case_number(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}-{}", at.year(), at.format("%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_case_number_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(case_number("CMP", at), "CMP-2025-0309140507");
        assert_eq!(case_number("INC", at), "INC-2025-0309140507");
    }
}
