//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra`.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{AccountId, SessionId};

use crate::domain::entity::{
    account::{Account, FailureOutcome, LockoutPolicy},
    session_fingerprint::{SessionFingerprint, SweepReport},
};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; `AuthError::Duplicate` if the email is taken
    async fn create(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Count one failed attempt and lock at the threshold, as one atomic step
    ///
    /// Must not count anything while a lock is active, and must compute the
    /// new count from the stored value rather than a previously read copy.
    /// `AuthError::NotFound` if the account does not exist.
    async fn record_failed_attempt(
        &self,
        account_id: &AccountId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AuthResult<FailureOutcome>;

    /// Zero the counter and unlock unconditionally
    async fn clear_lockout(&self, account_id: &AccountId, now: DateTime<Utc>) -> AuthResult<()>;

    /// Persist credential hash and password-age fields
    async fn update_credential(&self, account: &Account) -> AuthResult<()>;
}

/// Session fingerprint repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<SessionFingerprint>>;

    /// Insert or update
    async fn save(&self, session: &SessionFingerprint) -> AuthResult<()>;

    /// Delete every session idle for longer than `idle_timeout`, as one step
    ///
    /// Idleness is judged against the stored `last_active` at delete time, so
    /// a session touched while the sweep runs survives it.
    async fn destroy_idle(
        &self,
        now: DateTime<Utc>,
        idle_timeout: Duration,
    ) -> AuthResult<SweepReport>;
}
