//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{police_officer::PoliceOfficer, user::User};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: String,
    /// `worker` or `police`
    pub role: String,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer: Option<OfficerResponse>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email or mobile number
    pub identifier: String,
    pub password: String,
}

/// Login response. The token is also set as the session cookie.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

// ============================================================================
// Session Status
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub expires_at_ms: Option<i64>,
}

// ============================================================================
// Current user
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub role: String,
    pub last_login_at: Option<i64>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            full_name: user.full_name.clone(),
            email: user.email.as_ref().map(|e| e.as_str().to_string()),
            mobile: user.mobile.as_ref().map(|m| m.as_str().to_string()),
            role: user.user_role.code().to_string(),
            last_login_at: user.last_login_at.map(|t| t.timestamp_millis()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerResponse {
    pub badge_number: String,
    pub station_code: String,
    pub station_name: String,
    pub district: String,
    pub state: String,
    pub rank: String,
}

impl From<&PoliceOfficer> for OfficerResponse {
    fn from(officer: &PoliceOfficer) -> Self {
        Self {
            badge_number: officer.badge_number.clone(),
            station_code: officer.station_code.clone(),
            station_name: officer.station_name.clone(),
            district: officer.district.clone(),
            state: officer.state.clone(),
            rank: officer.rank.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer: Option<OfficerResponse>,
}
