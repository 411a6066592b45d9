//! Check Session Use Case
//!
//! Verifies and retrieves session information.

use std::sync::Arc;

use kernel::id::AuthSessionId;
use platform::crypto::verify_token;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

/// Session info output
#[derive(Debug, Clone)]
pub struct SessionInfoOutput {
    pub user_id: String,
    pub user_role: String,
    pub expires_at_ms: i64,
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Check if session is valid and return session info
    pub async fn execute(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<SessionInfoOutput> {
        let session = self.get_session(session_token, fingerprint_hash).await?;

        Ok(SessionInfoOutput {
            user_id: session.user_id.to_string(),
            user_role: session.user_role.code().to_string(),
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Resolve a live session and record activity
    pub async fn get_session(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<AuthSession> {
        let session_id = parse_session_token(&self.config, session_token)?;

        let mut session = self
            .session_repo
            .find_session(&session_id, fingerprint_hash)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete_session(&session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        session.touch();

        // Activity is best effort and must not delay the request
        let session_clone = session.clone();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.touch_session(&session_clone).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}

/// Verify the token signature and extract the session id
pub(crate) fn parse_session_token(config: &AuthConfig, token: &str) -> AuthResult<AuthSessionId> {
    verify_token(&config.session_secret, token)
        .and_then(|payload| payload.parse().ok())
        .ok_or(AuthError::SessionInvalid)
}
