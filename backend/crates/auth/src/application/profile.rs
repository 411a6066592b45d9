//! Profile Use Case
//!
//! The signed-in account, plus the officer profile for police.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::{police_officer::PoliceOfficer, user::User};
use crate::domain::repository::{OfficerRepository, UserRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct ProfileOutput {
    pub user: User,
    pub officer: Option<PoliceOfficer>,
}

pub struct ProfileUseCase<R>
where
    R: UserRepository + OfficerRepository,
{
    repo: Arc<R>,
}

impl<R> ProfileUseCase<R>
where
    R: UserRepository + OfficerRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<ProfileOutput> {
        // A session outliving its account is treated as no session
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let officer = match user.user_role {
            UserRole::Police => self.repo.find_officer_by_user_id(user_id).await?,
            _ => None,
        };

        Ok(ProfileOutput { user, officer })
    }
}
