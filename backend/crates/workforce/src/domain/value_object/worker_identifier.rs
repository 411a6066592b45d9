use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::worker_category::{WorkerCategory, identifier_code};

const ISSUER: &str = "IND-WRK";
const SEQUENCE_DIGITS: usize = 6;

/// Official worker identifier, `IND-WRK-{CAT}-{YEAR}-{SEQ:06}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct WorkerIdentifier(String);

impl WorkerIdentifier {
    /// Identifier for the given category, year and sequence number
    pub fn issue(category: Option<WorkerCategory>, year: i32, sequence: u32) -> Self {
        Self(format!(
            "{}{:0width$}",
            Self::prefix(category, year),
            sequence,
            width = SEQUENCE_DIGITS
        ))
    }

    /// Prefix shared by every identifier of one category and year
    pub fn prefix(category: Option<WorkerCategory>, year: i32) -> String {
        format!("{ISSUER}-{}-{year}-", identifier_code(category))
    }

    /// Parse a well-formed identifier, e.g. from a scanned QR code
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let rest = value.strip_prefix(ISSUER)?.strip_prefix('-')?;
        let mut parts = rest.split('-');

        let code = parts.next()?;
        let year = parts.next()?;
        let sequence = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let code_ok = code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase());
        let year_ok = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
        let sequence_ok =
            sequence.len() >= SEQUENCE_DIGITS && sequence.bytes().all(|b| b.is_ascii_digit());

        (code_ok && year_ok && sequence_ok).then(|| Self(value.to_string()))
    }

    /// Trusted value from the database
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix
    pub fn sequence(&self) -> Option<u32> {
        self.0.rsplit('-').next()?.parse().ok()
    }
}

impl AsRef<str> for WorkerIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
