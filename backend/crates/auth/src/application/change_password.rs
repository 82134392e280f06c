//! Change Password Use Case
//!
//! Replaces the credential of the authenticated account and restarts the
//! advisory password lifetime. Lock counters are untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::service::PasswordHasher;
use crate::domain::value_object::{identity::Identity, password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug)]
pub struct ChangePasswordOutput {
    pub password_expires_at: DateTime<Utc>,
}

pub struct ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    config: Arc<AuthConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, hasher: Arc<dyn PasswordHasher>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            hasher,
            config,
        }
    }

    pub async fn execute(
        &self,
        identity: &Identity,
        input: ChangePasswordInput,
    ) -> AuthResult<ChangePasswordOutput> {
        let new_password = RawPassword::for_registration(input.new_password)?;

        let mut account = bounded::storage(
            self.config.storage_timeout,
            self.repo.find_by_id(&identity.account_id),
        )
        .await?
        .ok_or(AuthError::NotFound)?;

        let current = RawPassword::for_verification(input.current_password);
        let stored = account.credential_hash.clone();
        let matched = bounded::hashing(
            self.config.hashing_timeout,
            self.hasher.clone(),
            move |hasher| hasher.verify(&current, &stored),
        )
        .await?;
        if !matched {
            tracing::warn!(
                account_id = %account.account_id,
                "Password change rejected: current password mismatch"
            );
            return Err(AuthError::CurrentPasswordMismatch);
        }

        let new_hash = bounded::hashing(
            self.config.hashing_timeout,
            self.hasher.clone(),
            move |hasher| hasher.hash(&new_password),
        )
        .await?;

        account.change_credential(new_hash, self.config.password_validity, Utc::now());
        bounded::storage(
            self.config.storage_timeout,
            self.repo.update_credential(&account),
        )
        .await?;

        tracing::info!(account_id = %account.account_id, "Password changed");

        Ok(ChangePasswordOutput {
            password_expires_at: account.password_expires_at,
        })
    }
}
