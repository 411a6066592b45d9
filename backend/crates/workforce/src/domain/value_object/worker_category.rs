use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a worker is onboarded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerCategory {
    DeliveryWorker,
    AepsAgent,
}

impl WorkerCategory {
    /// Identifier code for workers whose category is unknown
    pub const FALLBACK_CODE: &'static str = "WRK";

    pub fn code(&self) -> &'static str {
        match self {
            WorkerCategory::DeliveryWorker => "delivery_worker",
            WorkerCategory::AepsAgent => "aeps_agent",
        }
    }

    /// Accepts the stored codes and the short forms used by the form
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "delivery_worker" | "delivery" => Some(WorkerCategory::DeliveryWorker),
            "aeps_agent" | "aeps" => Some(WorkerCategory::AepsAgent),
            _ => None,
        }
    }

    /// Three-letter code embedded in the worker identifier
    pub fn identifier_code(&self) -> &'static str {
        match self {
            WorkerCategory::DeliveryWorker => "DLV",
            WorkerCategory::AepsAgent => "AEP",
        }
    }

    pub fn is_aeps(&self) -> bool {
        matches!(self, WorkerCategory::AepsAgent)
    }
}

/// Identifier code for an optional category
pub fn identifier_code(category: Option<WorkerCategory>) -> &'static str {
    category
        .map(|c| c.identifier_code())
        .unwrap_or(WorkerCategory::FALLBACK_CODE)
}

impl fmt::Display for WorkerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
