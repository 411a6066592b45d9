//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{AuthSessionId, UserId};

use crate::domain::entity::{auth_session::AuthSession, police_officer::PoliceOfficer, user::User};
use crate::domain::value_object::{email::Email, mobile::Mobile};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new account, its officer profile when given, and the
    /// `user_signup` audit entry, atomically
    ///
    /// Duplicate email or mobile yields `EmailTaken` / `MobileTaken`.
    async fn create(&self, user: &User, officer: Option<&PoliceOfficer>) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_mobile(&self, mobile: &Mobile) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn exists_by_mobile(&self, mobile: &Mobile) -> AuthResult<bool>;

    /// Persist login bookkeeping (failures, lockout, last login)
    async fn update_login_state(&self, user: &User) -> AuthResult<()>;
}

/// Police officer repository trait
#[trait_variant::make(OfficerRepository: Send)]
pub trait LocalOfficerRepository {
    /// Next value of the officer numbering sequence
    async fn next_officer_sequence(&self) -> AuthResult<i64>;

    async fn find_officer_by_user_id(&self, user_id: &UserId)
    -> AuthResult<Option<PoliceOfficer>>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find a session created with the same client fingerprint
    async fn find_session(
        &self,
        session_id: &AuthSessionId,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>>;

    /// Record last activity
    async fn touch_session(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete_session(&self, session_id: &AuthSessionId) -> AuthResult<()>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Everything the auth handlers need from storage
pub trait AuthStore:
    UserRepository + OfficerRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository + OfficerRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}
