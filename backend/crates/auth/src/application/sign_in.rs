//! Sign In Use Case
//!
//! Authenticates by email or mobile and password, and opens a session.

use std::sync::Arc;

use platform::client::ClientFingerprint;
use platform::crypto::sign_token;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, mobile::Mobile};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    /// Email or mobile number
    pub identifier: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug, Clone)]
pub struct SignInOutput {
    /// Signed token for the cookie and the bearer header
    pub session_token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + AuthSessionRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + AuthSessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<SignInOutput> {
        let identifier = input.identifier.trim();

        let user = if identifier.contains('@') {
            let email = Email::new(identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.repo.find_by_email(&email).await?
        } else {
            let mobile = Mobile::new(identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.repo.find_by_mobile(&mobile).await?
        };

        let mut user = user.ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }
        if user.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        let password = ClearTextPassword::for_login(input.password);
        if !user.password_hash.verify(&password, self.config.pepper()) {
            user.record_failure();
            self.repo.update_login_state(&user).await?;
            if user.is_locked() {
                tracing::warn!(user_id = %user.user_id, "Account locked after repeated failures");
            }
            return Err(AuthError::InvalidCredentials);
        }

        user.record_login();
        self.repo.update_login_state(&user).await?;

        let session = AuthSession::new(
            user.user_id,
            user.user_role,
            &fingerprint,
            self.config.session_ttl_chrono(),
        );
        self.repo.create_session(&session).await?;

        let session_token = sign_token(&self.config.session_secret, &session.session_id.to_string());

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            role = %user.user_role,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user,
        })
    }
}
