//! Sign In Use Case
//!
//! The account guard: lock check, password comparison, counter update and
//! token issuance, in that order. A locked account is rejected before the
//! hasher is ever invoked.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::entity::account::{Account, FailureOutcome, minutes_until};
use crate::domain::repository::AccountRepository;
use crate::domain::service::{PasswordHasher, TokenIssuer};
use crate::domain::value_object::{
    account_role::AccountRole, email::Email, identity::Identity, password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Account fields safe to return to the client
#[derive(Debug, Clone)]
pub struct PublicProfile {
    pub account_id: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: AccountRole,
    pub password_expires_at: DateTime<Utc>,
}

impl From<&Account> for PublicProfile {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            email: account.email.as_str().to_string(),
            first_name: account.first_name.as_str().to_string(),
            last_name: account.last_name.as_str().to_string(),
            phone: account.phone.as_str().to_string(),
            role: account.role,
            password_expires_at: account.password_expires_at,
        }
    }
}

#[derive(Debug)]
pub struct SignInOutput {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: PublicProfile,
    /// Advisory: the client should prompt for a new password
    pub password_expired: bool,
}

pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(
        repo: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // A malformed email cannot match any stored account
        let email = Email::new(input.email).map_err(|_| AuthError::NotFound)?;

        let account = bounded::storage(
            self.config.storage_timeout,
            self.repo.find_by_email(&email),
        )
        .await?
        .ok_or(AuthError::NotFound)?;

        let now = Utc::now();
        if let Some(until) = account.active_lock(now) {
            let minutes_remaining = minutes_until(until, now);
            tracing::warn!(
                account_id = %account.account_id,
                minutes_remaining,
                "Login rejected: account locked"
            );
            return Err(AuthError::Locked { minutes_remaining });
        }

        let password = RawPassword::for_verification(input.password);
        let stored = account.credential_hash.clone();
        let matched = bounded::hashing(
            self.config.hashing_timeout,
            self.hasher.clone(),
            move |hasher| hasher.verify(&password, &stored),
        )
        .await?;

        if !matched {
            return Err(self.reject(&account.account_id).await);
        }

        let now = Utc::now();
        bounded::storage(
            self.config.storage_timeout,
            self.repo.clear_lockout(&account.account_id, now),
        )
        .await?;

        let identity = Identity::new(account.account_id, account.role);
        let issued = self.tokens.issue(&identity, now)?;

        tracing::info!(
            account_id = %account.account_id,
            role = %account.role,
            "User signed in"
        );

        Ok(SignInOutput {
            token: issued.token,
            expires_at: issued.expires_at,
            password_expired: account.is_password_expired(now),
            profile: PublicProfile::from(&account),
        })
    }

    /// Record the failure atomically and translate the outcome
    async fn reject(&self, account_id: &AccountId) -> AuthError {
        let now = Utc::now();
        let outcome = bounded::storage(
            self.config.storage_timeout,
            self.repo
                .record_failed_attempt(account_id, &self.config.lockout, now),
        )
        .await;

        match outcome {
            Ok(FailureOutcome::Remaining {
                attempts,
                remaining,
            }) => {
                tracing::warn!(
                    account_id = %account_id,
                    attempts,
                    remaining,
                    "Failed login attempt"
                );
                AuthError::InvalidCredentials {
                    attempts_remaining: remaining,
                }
            }
            Ok(FailureOutcome::LockedNow { until }) => {
                tracing::warn!(
                    account_id = %account_id,
                    locked_until = %until,
                    "Account locked after too many failed attempts"
                );
                AuthError::Locked {
                    minutes_remaining: minutes_until(until, now),
                }
            }
            Ok(FailureOutcome::AlreadyLocked { until }) => AuthError::Locked {
                minutes_remaining: minutes_until(until, now),
            },
            Err(e) => e,
        }
    }
}
