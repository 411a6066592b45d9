//! Police Officer Entity
//!
//! Provisioned together with every `police` account. The officer and
//! station numbers come from one database sequence; station details start
//! at fixed defaults and are corrected by an administrator later.

use chrono::{DateTime, Datelike, Utc};
use kernel::id::{OfficerId, UserId};

pub const DEFAULT_STATION_NAME: &str = "Central Police Station";
pub const DEFAULT_DISTRICT: &str = "District HQ";
pub const DEFAULT_STATE: &str = "Bihar";
pub const DEFAULT_RANK: &str = "Inspector";

#[derive(Debug, Clone)]
pub struct PoliceOfficer {
    pub officer_id: OfficerId,
    pub user_id: UserId,
    /// Service number, `OFF-{year}-{seq:05}`
    pub badge_number: String,
    /// `PS{seq:03}`
    pub station_code: String,
    pub station_name: String,
    pub district: String,
    pub state: String,
    pub rank: String,
    pub created_at: DateTime<Utc>,
}

impl PoliceOfficer {
    pub fn provision(user_id: UserId, sequence: i64) -> Self {
        let now = Utc::now();
        Self {
            officer_id: OfficerId::new(),
            user_id,
            badge_number: badge_number(now.year(), sequence),
            station_code: station_code(sequence),
            station_name: DEFAULT_STATION_NAME.to_string(),
            district: DEFAULT_DISTRICT.to_string(),
            state: DEFAULT_STATE.to_string(),
            rank: DEFAULT_RANK.to_string(),
            created_at: now,
        }
    }
}

pub fn badge_number(year: i32, sequence: i64) -> String {
    format!("OFF-{year}-{sequence:05}")
}

pub fn station_code(sequence: i64) -> String {
    format!("PS{sequence:03}")
}
