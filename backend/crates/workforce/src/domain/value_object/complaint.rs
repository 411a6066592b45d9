use serde::{Deserialize, Serialize};

/// What a citizen complains about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Fraud,
    Misbehavior,
    Misuse,
    Theft,
    Other,
}

impl ComplaintCategory {
    pub fn code(&self) -> &'static str {
        match self {
            ComplaintCategory::Fraud => "fraud",
            ComplaintCategory::Misbehavior => "misbehavior",
            ComplaintCategory::Misuse => "misuse",
            ComplaintCategory::Theft => "theft",
            ComplaintCategory::Other => "other",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fraud" => Some(ComplaintCategory::Fraud),
            "misbehavior" => Some(ComplaintCategory::Misbehavior),
            "misuse" => Some(ComplaintCategory::Misuse),
            "theft" => Some(ComplaintCategory::Theft),
            "other" => Some(ComplaintCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::Investigating => "investigating",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "open" => Some(ComplaintStatus::Open),
            "investigating" => Some(ComplaintStatus::Investigating),
            "resolved" => Some(ComplaintStatus::Resolved),
            "closed" => Some(ComplaintStatus::Closed),
            _ => None,
        }
    }
}
