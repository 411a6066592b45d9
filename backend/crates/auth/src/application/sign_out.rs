//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::check_session::parse_session_token;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let session_id = parse_session_token(&self.config, session_token)?;
        self.session_repo.delete_session(&session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }
}
