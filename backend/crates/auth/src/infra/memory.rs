//! In-Memory Repository Implementation
//!
//! Backs the router and use-case tests. Each operation runs under a single
//! mutex guard, which gives `record_failed_attempt` the same atomicity as the
//! PostgreSQL conditional update.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{AccountId, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entity::{
    account::{Account, FailureOutcome, LockoutPolicy},
    session_fingerprint::{SessionFingerprint, SweepReport},
};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
    sessions: Arc<Mutex<HashMap<SessionId, SessionFingerprint>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: overwrite an account wholesale
    pub async fn put_account(&self, account: Account) {
        self.accounts
            .lock()
            .await
            .insert(account.account_id, account);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

impl AccountRepository for InMemoryAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::Duplicate);
        }
        accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.accounts.lock().await.get(account_id).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().any(|a| &a.email == email))
    }

    async fn record_failed_attempt(
        &self,
        account_id: &AccountId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> AuthResult<FailureOutcome> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(account_id).ok_or(AuthError::NotFound)?;
        Ok(account.register_failure(policy, now))
    }

    async fn clear_lockout(&self, account_id: &AccountId, now: DateTime<Utc>) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(account_id).ok_or(AuthError::NotFound)?;
        account.clear_lockout(now);
        Ok(())
    }

    async fn update_credential(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().await;
        let stored = accounts
            .get_mut(&account.account_id)
            .ok_or(AuthError::NotFound)?;
        stored.credential_hash = account.credential_hash.clone();
        stored.password_last_changed = account.password_last_changed;
        stored.password_expires_at = account.password_expires_at;
        stored.updated_at = account.updated_at;
        Ok(())
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<SessionFingerprint>> {
        Ok(self.sessions.lock().await.get(session_id).cloned())
    }

    async fn save(&self, session: &SessionFingerprint) -> AuthResult<()> {
        self.sessions
            .lock()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn destroy_idle(
        &self,
        now: DateTime<Utc>,
        idle_timeout: Duration,
    ) -> AuthResult<SweepReport> {
        let mut sessions = self.sessions.lock().await;
        let scanned = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, idle_timeout));

        Ok(SweepReport {
            scanned,
            destroyed: scanned - sessions.len(),
        })
    }
}
