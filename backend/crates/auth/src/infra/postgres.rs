//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::id::{AuthSessionId, OfficerId, UserId};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, police_officer::PoliceOfficer, user::User};
use crate::domain::repository::{AuthSessionRepository, OfficerRepository, UserRepository};
use crate::domain::value_object::{email::Email, mobile::Mobile, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = r#"
    id,
    full_name,
    email,
    mobile,
    role,
    password_hash,
    is_active,
    login_failed_count,
    locked_until,
    last_login_at,
    created_at,
    updated_at
"#;

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User, officer: Option<&PoliceOfficer>) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                full_name,
                email,
                mobile,
                role,
                password_hash,
                is_active,
                login_failed_count,
                locked_until,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.full_name)
        .bind(user.email.as_ref().map(Email::as_str))
        .bind(user.mobile.as_ref().map(Mobile::as_str))
        .bind(user.user_role.code())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_active)
        .bind(user.login_failed_count as i16)
        .bind(user.locked_until)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_contact_conflict)?;

        if let Some(officer) = officer {
            sqlx::query(
                r#"
                INSERT INTO police_officers (
                    id,
                    user_id,
                    badge_number,
                    station_code,
                    station_name,
                    district,
                    state,
                    rank,
                    created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(officer.officer_id.as_uuid())
            .bind(officer.user_id.as_uuid())
            .bind(&officer.badge_number)
            .bind(&officer.station_code)
            .bind(&officer.station_name)
            .bind(&officer.district)
            .bind(&officer.state)
            .bind(&officer.rank)
            .bind(officer.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO audit_logs (user_id, action, resource_type, resource_id, details, created_at)
            VALUES ($1, 'user_signup', 'user', $2, $3, $4)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_id.to_string())
        .bind(serde_json::json!({
            "role": user.user_role.code(),
            "badgeNumber": officer.map(|o| o.badge_number.as_str()),
        }))
        .bind(user.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_mobile(&self, mobile: &Mobile) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE mobile = $1"
        ))
        .bind(mobile.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_mobile(&self, mobile: &Mobile) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE mobile = $1)")
                .bind(mobile.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_login_state(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                login_failed_count = $2,
                locked_until = $3,
                last_login_at = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.login_failed_count as i16)
        .bind(user.locked_until)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Racing sign-ups pass the existence check and collide on the constraint
fn map_contact_conflict(err: sqlx::Error) -> AuthError {
    match unique_violation(&err) {
        Some("users_email_key") => AuthError::EmailTaken,
        Some("users_mobile_key") => AuthError::MobileTaken,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Officer Repository Implementation
// ============================================================================

impl OfficerRepository for PgAuthRepository {
    async fn next_officer_sequence(&self) -> AuthResult<i64> {
        let seq = sqlx::query_scalar::<_, i64>("SELECT nextval('police_officer_seq')")
            .fetch_one(&self.pool)
            .await?;

        Ok(seq)
    }

    async fn find_officer_by_user_id(
        &self,
        user_id: &UserId,
    ) -> AuthResult<Option<PoliceOfficer>> {
        let row = sqlx::query_as::<_, OfficerRow>(
            r#"
            SELECT
                id,
                user_id,
                badge_number,
                station_code,
                station_name,
                district,
                state,
                rank,
                created_at
            FROM police_officers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OfficerRow::into_officer))
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAuthRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                user_role,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.user_id.as_uuid())
        .bind(session.user_role.code())
        .bind(session.expires_at_ms)
        .bind(&session.client_fingerprint_hash)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(
        &self,
        session_id: &AuthSessionId,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                user_role,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            FROM auth_sessions
            WHERE session_id = $1 AND client_fingerprint_hash = $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(fingerprint_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AuthSessionRow::into_session).transpose()
    }

    async fn touch_session(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query("UPDATE auth_sessions SET last_activity_at = $2 WHERE session_id = $1")
            .bind(session.session_id.as_uuid())
            .bind(session.last_activity_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: &AuthSessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    email: Option<String>,
    mobile: Option<String>,
    role: String,
    password_hash: String,
    is_active: bool,
    login_failed_count: i16,
    locked_until: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = parse_role(&self.role)?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Stored hash for {}: {e}", self.id)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.id),
            full_name: self.full_name,
            email: self.email.map(Email::from_db),
            mobile: self.mobile.map(Mobile::from_db),
            user_role,
            password_hash,
            is_active: self.is_active,
            login_failed_count: self.login_failed_count.max(0) as u16,
            locked_until: self.locked_until,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OfficerRow {
    id: Uuid,
    user_id: Uuid,
    badge_number: String,
    station_code: String,
    station_name: String,
    district: String,
    state: String,
    rank: String,
    created_at: DateTime<Utc>,
}

impl OfficerRow {
    fn into_officer(self) -> PoliceOfficer {
        PoliceOfficer {
            officer_id: OfficerId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            badge_number: self.badge_number,
            station_code: self.station_code,
            station_name: self.station_name,
            district: self.district,
            state: self.state,
            rank: self.rank,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: Uuid,
    user_role: String,
    expires_at_ms: i64,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthResult<AuthSession> {
        Ok(AuthSession {
            session_id: AuthSessionId::from_uuid(self.session_id),
            user_id: UserId::from_uuid(self.user_id),
            user_role: parse_role(&self.user_role)?,
            expires_at_ms: self.expires_at_ms,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}

fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::from_code(code).ok_or_else(|| AuthError::Internal(format!("Unknown role: {code}")))
}
