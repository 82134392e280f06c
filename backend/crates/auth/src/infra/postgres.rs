//! PostgreSQL Repository Implementations

use chrono::{DateTime, Duration, Utc};
use kernel::id::{AccountId, SessionId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    account::{Account, FailureOutcome, LockState, LockoutPolicy},
    session_fingerprint::{SessionFingerprint, SweepReport},
};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{
    account_role::AccountRole,
    email::Email,
    password::CredentialHash,
    profile::{PersonName, PhoneNumber},
};
use crate::error::{AuthError, AuthResult};

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    email,
    first_name,
    last_name,
    phone,
    password_hash,
    is_admin,
    login_attempts,
    is_locked,
    lock_until,
    password_last_changed,
    password_expires_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed account and session repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                first_name,
                last_name,
                phone,
                password_hash,
                is_admin,
                login_attempts,
                is_locked,
                lock_until,
                password_last_changed,
                password_expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.first_name.as_str())
        .bind(account.last_name.as_str())
        .bind(account.phone.as_str())
        .bind(account.credential_hash.as_str())
        .bind(account.role.is_admin())
        .bind(attempts_to_db(account.login_attempts))
        .bind(account.lock_state.is_locked_flag())
        .bind(account.lock_state.until())
        .bind(account.password_last_changed)
        .bind(account.password_expires_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn record_failed_attempt(
        &self,
        account_id: &AccountId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AuthResult<FailureOutcome> {
        // SET expressions see the pre-update row, so the new count and the lock
        // decision are computed from the stored value in one statement.
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts SET
                login_attempts = login_attempts + 1,
                is_locked = (login_attempts + 1 >= $2),
                lock_until = CASE WHEN login_attempts + 1 >= $2 THEN $3 ELSE lock_until END,
                updated_at = $4
            WHERE account_id = $1
              AND NOT (is_locked AND lock_until IS NOT NULL AND lock_until > $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account_id.as_uuid())
        .bind(attempts_to_db(policy.max_attempts))
        .bind(now + policy.lock_duration)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row.into_account()?.failure_outcome(policy, now));
        }

        // Nothing updated: either the account is gone or a lock is active
        let account = self
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        Ok(match account.active_lock(now) {
            Some(until) => FailureOutcome::AlreadyLocked { until },
            None => account.failure_outcome(policy, now),
        })
    }

    async fn clear_lockout(&self, account_id: &AccountId, now: DateTime<Utc>) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE accounts SET
                login_attempts = 0,
                is_locked = FALSE,
                lock_until = NULL,
                updated_at = $2
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::NotFound);
        }

        Ok(())
    }

    async fn update_credential(&self, account: &Account) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE accounts SET
                password_hash = $2,
                password_last_changed = $3,
                password_expires_at = $4,
                updated_at = $5
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.credential_hash.as_str())
        .bind(account.password_last_changed)
        .bind(account.password_expires_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::NotFound);
        }

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<SessionFingerprint>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                bound_user_agent,
                bound_ip,
                last_active,
                created_at
            FROM session_fingerprints
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn save(&self, session: &SessionFingerprint) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_fingerprints (
                session_id,
                bound_user_agent,
                bound_ip,
                last_active,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (session_id) DO UPDATE SET
                last_active = EXCLUDED.last_active
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(&session.bound_user_agent)
        .bind(session.bound_ip.map(|ip| ip.to_string()))
        .bind(session.last_active)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn destroy_idle(
        &self,
        now: DateTime<Utc>,
        idle_timeout: Duration,
    ) -> AuthResult<SweepReport> {
        // The outer SELECT sees the table as it was before the DELETE
        let (scanned, destroyed) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            WITH swept AS (
                DELETE FROM session_fingerprints
                WHERE last_active < $1
                RETURNING session_id
            )
            SELECT
                (SELECT COUNT(*) FROM session_fingerprints) AS scanned,
                (SELECT COUNT(*) FROM swept) AS destroyed
            "#,
        )
        .bind(now - idle_timeout)
        .fetch_one(&self.pool)
        .await?;

        Ok(SweepReport {
            scanned: usize::try_from(scanned).unwrap_or_default(),
            destroyed: usize::try_from(destroyed).unwrap_or_default(),
        })
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn attempts_to_db(attempts: u32) -> i32 {
    i32::try_from(attempts).unwrap_or(i32::MAX)
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    phone: String,
    password_hash: String,
    is_admin: bool,
    login_attempts: i32,
    is_locked: bool,
    lock_until: Option<DateTime<Utc>>,
    password_last_changed: DateTime<Utc>,
    password_expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let login_attempts = u32::try_from(self.login_attempts).map_err(|_| {
            AuthError::Internal(format!("Negative login_attempts: {}", self.login_attempts))
        })?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            phone: PhoneNumber::from_db(self.phone),
            credential_hash: CredentialHash::from_db(self.password_hash),
            role: AccountRole::from_is_admin(self.is_admin),
            login_attempts,
            lock_state: LockState::from_db(self.is_locked, self.lock_until),
            password_last_changed: self.password_last_changed,
            password_expires_at: self.password_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    bound_user_agent: Option<String>,
    bound_ip: Option<String>,
    last_active: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> SessionFingerprint {
        SessionFingerprint {
            session_id: SessionId::from_uuid(self.session_id),
            bound_user_agent: self.bound_user_agent,
            // Unparseable values compare as "no IP"
            bound_ip: self.bound_ip.and_then(|ip| ip.parse().ok()),
            last_active: self.last_active,
            created_at: self.created_at,
        }
    }
}
