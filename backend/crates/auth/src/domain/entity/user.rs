//! User Entity
//!
//! One account per person, whatever the role. Login bookkeeping (failure
//! counter and lockout) lives on the same row.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, mobile::Mobile, user_role::UserRole};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub full_name: String,
    pub email: Option<Email>,
    pub mobile: Option<Mobile>,
    pub user_role: UserRole,
    pub password_hash: HashedPassword,
    /// Deactivated accounts cannot log in
    pub is_active: bool,
    /// Consecutive login failures
    pub login_failed_count: u16,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Failures before a temporary lockout
    pub const MAX_LOGIN_FAILURES: u16 = 5;
    pub const LOCKOUT_MINUTES: i64 = 15;

    pub fn new(
        full_name: String,
        email: Option<Email>,
        mobile: Option<Mobile>,
        user_role: UserRole,
        password_hash: HashedPassword,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            full_name,
            email,
            mobile,
            user_role,
            password_hash,
            is_active: true,
            login_failed_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some_and(|until| Utc::now() < until)
    }

    /// Count a failed password; the fifth in a row locks the account
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count = self.login_failed_count.saturating_add(1);
        self.updated_at = now;

        if self.login_failed_count >= Self::MAX_LOGIN_FAILURES {
            self.locked_until = Some(now + Duration::minutes(Self::LOCKOUT_MINUTES));
            self.login_failed_count = 0;
        }
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.login_failed_count = 0;
        self.locked_until = None;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}
