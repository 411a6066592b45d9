//! Mobile Number Value Object
//!
//! Indian mobile numbers, stored as the bare 10-digit subscriber number.
//! `+91 98765 43210`, `09876543210` and `9876543210` are the same number.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mobile(String);

impl Mobile {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let digits: String = raw
            .as_ref()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        let digits = digits.strip_prefix('+').unwrap_or(&digits);

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request("Mobile number must contain digits only"));
        }

        let subscriber = match digits.len() {
            10 => digits,
            11 if digits.starts_with('0') => &digits[1..],
            12 if digits.starts_with("91") => &digits[2..],
            _ => return Err(AppError::bad_request("Mobile number must have 10 digits")),
        };

        if !subscriber.starts_with(['6', '7', '8', '9']) {
            return Err(AppError::bad_request("Mobile number must start with 6-9"));
        }

        Ok(Self(subscriber.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits, for logs
    pub fn masked(&self) -> String {
        let tail = self.0.get(self.0.len().saturating_sub(4)..).unwrap_or_default();
        format!("******{tail}")
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
