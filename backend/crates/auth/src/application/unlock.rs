//! Unlock Account Use Case
//!
//! Administrative reset of the login counter and lock. Idempotent.

use std::sync::Arc;

use chrono::Utc;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{email::Email, identity::Identity};
use crate::error::{AuthError, AuthResult};

pub struct UnlockInput {
    pub email: String,
}

#[derive(Debug)]
pub struct UnlockOutput {
    pub email: Email,
    /// Whether the account had a counter or lock to clear
    pub was_locked: bool,
}

pub struct UnlockUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> UnlockUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, actor: &Identity, input: UnlockInput) -> AuthResult<UnlockOutput> {
        let email = Email::new(input.email)?;

        let account = bounded::storage(
            self.config.storage_timeout,
            self.repo.find_by_email(&email),
        )
        .await?
        .ok_or(AuthError::NotFound)?;

        let was_locked = account.login_attempts > 0 || account.lock_state.is_locked_flag();

        bounded::storage(
            self.config.storage_timeout,
            self.repo.clear_lockout(&account.account_id, Utc::now()),
        )
        .await?;

        tracing::info!(
            actor = %actor.account_id,
            account_id = %account.account_id,
            was_locked,
            "Account unlocked"
        );

        Ok(UnlockOutput { email, was_locked })
    }
}
