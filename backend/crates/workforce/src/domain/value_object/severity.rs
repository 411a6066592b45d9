/// Incident severity as reported by the officer
///
/// Unrecognised values are kept verbatim and weigh in at the default rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl Severity {
    const DEFAULT_RISK: i32 = 10;

    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Other(value) => value,
        }
    }

    /// Points added to the worker's risk score
    pub fn risk_increment(&self) -> i32 {
        match self {
            Severity::Low => 5,
            Severity::Medium => 15,
            Severity::High => 30,
            Severity::Critical => 50,
            Severity::Other(_) => Self::DEFAULT_RISK,
        }
    }
}
