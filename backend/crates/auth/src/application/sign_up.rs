//! Sign Up Use Case
//!
//! Creates an account for a worker or a police officer. Police accounts get
//! an officer profile in the same transaction.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{police_officer::PoliceOfficer, user::User};
use crate::domain::repository::{OfficerRepository, UserRepository};
use crate::domain::value_object::{email::Email, mobile::Mobile, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

const MAX_NAME_LENGTH: usize = 200;

/// Sign up input
pub struct SignUpInput {
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: String,
    pub role: String,
}

/// Sign up output
#[derive(Debug, Clone)]
pub struct SignUpOutput {
    pub user: User,
    pub officer: Option<PoliceOfficer>,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository + OfficerRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository + OfficerRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let role = UserRole::from_code(input.role.trim())
            .filter(UserRole::is_self_service)
            .ok_or_else(|| AuthError::InvalidRole(input.role.clone()))?;

        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() || full_name.chars().count() > MAX_NAME_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "Full name must be 1 to {MAX_NAME_LENGTH} characters"
            )));
        }

        let email = non_blank(input.email).map(Email::new).transpose()?;
        let mobile = non_blank(input.mobile).map(Mobile::new).transpose()?;
        if email.is_none() && mobile.is_none() {
            return Err(AuthError::MissingContact);
        }

        if let Some(email) = &email {
            if self.repo.exists_by_email(email).await? {
                return Err(AuthError::EmailTaken);
            }
        }
        if let Some(mobile) = &mobile {
            if self.repo.exists_by_mobile(mobile).await? {
                return Err(AuthError::MobileTaken);
            }
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(full_name, email, mobile, role, password_hash);

        let officer = match role {
            UserRole::Police => {
                let sequence = self.repo.next_officer_sequence().await?;
                Some(PoliceOfficer::provision(user.user_id, sequence))
            }
            _ => None,
        };

        self.repo.create(&user, officer.as_ref()).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.user_role,
            badge_number = officer.as_ref().map(|o| o.badge_number.as_str()),
            "User signed up"
        );

        Ok(SignUpOutput { user, officer })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
