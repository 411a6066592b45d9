//! Worker and verification status codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Active,
    Inactive,
    Suspended,
    Blocked,
    PendingVerification,
}

impl WorkerStatus {
    pub fn code(&self) -> &'static str {
        match self {
            WorkerStatus::Active => "active",
            WorkerStatus::Inactive => "inactive",
            WorkerStatus::Suspended => "suspended",
            WorkerStatus::Blocked => "blocked",
            WorkerStatus::PendingVerification => "pending_verification",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(WorkerStatus::Active),
            "inactive" => Some(WorkerStatus::Inactive),
            "suspended" => Some(WorkerStatus::Suspended),
            "blocked" => Some(WorkerStatus::Blocked),
            "pending_verification" => Some(WorkerStatus::PendingVerification),
            _ => None,
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Police verification state of a worker, and the status of a verification record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl VerificationStatus {
    pub fn code(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::Expired => "expired",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(VerificationStatus::Pending),
            "verified" => Some(VerificationStatus::Verified),
            "rejected" => Some(VerificationStatus::Rejected),
            "expired" => Some(VerificationStatus::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome an officer may record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Verified,
    Rejected,
}

impl Decision {
    /// Only `verified` and `rejected` are decisions
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "verified" => Some(Decision::Verified),
            "rejected" => Some(Decision::Rejected),
            _ => None,
        }
    }

    pub fn verification_status(&self) -> VerificationStatus {
        match self {
            Decision::Verified => VerificationStatus::Verified,
            Decision::Rejected => VerificationStatus::Rejected,
        }
    }

    /// Worker status after the decision
    pub fn worker_status(&self) -> WorkerStatus {
        match self {
            Decision::Verified => WorkerStatus::Active,
            Decision::Rejected => WorkerStatus::Blocked,
        }
    }
}
