//! Account Entity
//!
//! A storefront customer (or admin) together with the security counters that
//! drive the login lockout state machine:
//!
//! ```text
//! Unlocked(n) --fail, n+1 < max--> Unlocked(n+1)
//! Unlocked(n) --fail, n+1 >= max--> Locked(now + lock_duration)
//! Locked(t)   --attempt before t--> Locked(t)        (no verify, no count)
//! any         --success / unlock--> Unlocked(0)
//! ```
//!
//! An expired lock is not reset by time alone: the counter stays at the
//! threshold until a successful login or an explicit unlock.

use chrono::{DateTime, Duration, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{
    account_role::AccountRole,
    email::Email,
    password::CredentialHash,
    profile::{PersonName, PhoneNumber},
};

/// Lockout thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lock
    pub max_attempts: u32,
    pub lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lock_duration: Duration::minutes(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked { until: DateTime<Utc> },
}

impl LockState {
    pub fn is_locked_flag(&self) -> bool {
        matches!(self, LockState::Locked { .. })
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        match self {
            LockState::Locked { until } => Some(*until),
            LockState::Unlocked => None,
        }
    }

    pub fn from_db(is_locked: bool, lock_until: Option<DateTime<Utc>>) -> Self {
        match (is_locked, lock_until) {
            (true, Some(until)) => LockState::Locked { until },
            _ => LockState::Unlocked,
        }
    }
}

/// Result of recording one failed password comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Counted; still below the threshold
    Remaining { attempts: u32, remaining: u32 },
    /// This failure reached the threshold
    LockedNow { until: DateTime<Utc> },
    /// A lock was already active; nothing was counted
    AlreadyLocked { until: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub email: Email,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
    pub credential_hash: CredentialHash,
    pub role: AccountRole,
    pub login_attempts: u32,
    pub lock_state: LockState,
    pub password_last_changed: DateTime<Utc>,
    /// Advisory only; not enforced at login
    pub password_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration fields
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
}

impl Account {
    /// Fresh standard account with zeroed counters
    pub fn register(
        fields: NewAccount,
        credential_hash: CredentialHash,
        password_validity: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: AccountId::new(),
            email: fields.email,
            first_name: fields.first_name,
            last_name: fields.last_name,
            phone: fields.phone,
            credential_hash,
            role: AccountRole::Standard,
            login_attempts: 0,
            lock_state: LockState::Unlocked,
            password_last_changed: now,
            password_expires_at: now + password_validity,
            created_at: now,
            updated_at: now,
        }
    }

    /// The lock deadline, if a lock is in force at `now`
    pub fn active_lock(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.lock_state.until().filter(|until| *until > now)
    }

    /// Apply one failed attempt
    ///
    /// Storage adapters must perform the equivalent update atomically.
    pub fn register_failure(&mut self, policy: &LockoutPolicy, now: DateTime<Utc>) -> FailureOutcome {
        if let Some(until) = self.active_lock(now) {
            return FailureOutcome::AlreadyLocked { until };
        }

        self.login_attempts = self.login_attempts.saturating_add(1);
        self.updated_at = now;

        if self.login_attempts >= policy.max_attempts {
            let until = now + policy.lock_duration;
            self.lock_state = LockState::Locked { until };
            FailureOutcome::LockedNow { until }
        } else {
            FailureOutcome::Remaining {
                attempts: self.login_attempts,
                remaining: policy.max_attempts - self.login_attempts,
            }
        }
    }

    /// Describe the state left behind by a failure that has already been applied
    pub fn failure_outcome(&self, policy: &LockoutPolicy, now: DateTime<Utc>) -> FailureOutcome {
        match self.active_lock(now) {
            Some(until) => FailureOutcome::LockedNow { until },
            None => FailureOutcome::Remaining {
                attempts: self.login_attempts,
                remaining: policy.max_attempts.saturating_sub(self.login_attempts),
            },
        }
    }

    /// Successful login or administrative unlock
    pub fn clear_lockout(&mut self, now: DateTime<Utc>) {
        self.login_attempts = 0;
        self.lock_state = LockState::Unlocked;
        self.updated_at = now;
    }

    pub fn change_credential(
        &mut self,
        credential_hash: CredentialHash,
        password_validity: Duration,
        now: DateTime<Utc>,
    ) {
        self.credential_hash = credential_hash;
        self.password_last_changed = now;
        self.password_expires_at = now + password_validity;
        self.updated_at = now;
    }

    pub fn is_password_expired(&self, now: DateTime<Utc>) -> bool {
        self.password_expires_at <= now
    }
}

/// Whole minutes until `until`, rounded up
pub fn minutes_until(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (until - now).num_milliseconds().max(0);
    (ms + 59_999) / 60_000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(now: DateTime<Utc>) -> Account {
        Account::register(
            NewAccount {
                email: Email::new("alice@example.com").unwrap(),
                first_name: PersonName::from_db("Alice"),
                last_name: PersonName::from_db("Liddell"),
                phone: PhoneNumber::from_db("5550100"),
            },
            CredentialHash::from_db("hash"),
            Duration::days(30),
            now,
        )
    }

    #[test]
    fn test_register_defaults() {
        let now = Utc::now();
        let a = account(now);
        assert_eq!(a.login_attempts, 0);
        assert_eq!(a.lock_state, LockState::Unlocked);
        assert_eq!(a.role, AccountRole::Standard);
        assert_eq!(a.password_expires_at, now + Duration::days(30));
        assert!(!a.is_password_expired(now));
    }

    #[test]
    fn test_fifth_failure_locks() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut a = account(now);

        for n in 1..=4 {
            assert_eq!(
                a.register_failure(&policy, now),
                FailureOutcome::Remaining {
                    attempts: n,
                    remaining: 5 - n
                }
            );
        }

        let until = now + Duration::minutes(30);
        assert_eq!(
            a.register_failure(&policy, now),
            FailureOutcome::LockedNow { until }
        );
        assert_eq!(a.active_lock(now), Some(until));
    }

    #[test]
    fn test_failure_while_locked_is_not_counted() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut a = account(now);
        for _ in 0..5 {
            a.register_failure(&policy, now);
        }

        let later = now + Duration::minutes(10);
        assert!(matches!(
            a.register_failure(&policy, later),
            FailureOutcome::AlreadyLocked { .. }
        ));
        assert_eq!(a.login_attempts, 5);
    }

    #[test]
    fn test_expired_lock_relocks_on_next_failure() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut a = account(now);
        for _ in 0..5 {
            a.register_failure(&policy, now);
        }

        let after = now + Duration::minutes(31);
        assert_eq!(a.active_lock(after), None);
        assert!(matches!(
            a.register_failure(&policy, after),
            FailureOutcome::LockedNow { .. }
        ));
    }

    #[test]
    fn test_clear_lockout_resets() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut a = account(now);
        for _ in 0..5 {
            a.register_failure(&policy, now);
        }

        a.clear_lockout(now);
        assert_eq!(a.login_attempts, 0);
        assert_eq!(a.lock_state, LockState::Unlocked);
        assert_eq!(a.active_lock(now), None);
    }

    #[test]
    fn test_failure_outcome_matches_register_failure() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut a = account(now);
        for _ in 0..5 {
            let applied = a.register_failure(&policy, now);
            assert_eq!(a.failure_outcome(&policy, now), applied);
        }
    }

    #[test]
    fn test_change_credential_extends_expiry() {
        let now = Utc::now();
        let mut a = account(now - Duration::days(40));
        assert!(a.is_password_expired(now));

        a.change_credential(CredentialHash::from_db("new"), Duration::days(30), now);
        assert_eq!(a.password_last_changed, now);
        assert!(!a.is_password_expired(now));
    }

    #[test]
    fn test_minutes_until_rounds_up() {
        let now = Utc::now();
        assert_eq!(minutes_until(now + Duration::minutes(30), now), 30);
        assert_eq!(minutes_until(now + Duration::seconds(61), now), 2);
        assert_eq!(minutes_until(now + Duration::milliseconds(1), now), 1);
        assert_eq!(minutes_until(now - Duration::seconds(5), now), 0);
    }

    #[test]
    fn test_lock_state_from_db() {
        let until = Utc::now();
        assert_eq!(
            LockState::from_db(true, Some(until)),
            LockState::Locked { until }
        );
        assert_eq!(LockState::from_db(false, Some(until)), LockState::Unlocked);
        assert_eq!(LockState::from_db(true, None), LockState::Unlocked);
    }
}
