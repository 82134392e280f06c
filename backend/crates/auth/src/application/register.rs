//! Register Use Case
//!
//! Creates a standard account with zeroed security counters.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::AccountId;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::service::PasswordHasher;
use crate::domain::value_object::{
    email::Email,
    password::RawPassword,
    profile::{PersonName, PhoneNumber},
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub account_id: AccountId,
    pub email: Email,
}

pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let fields = NewAccount {
            first_name: PersonName::new(&input.first_name, "First name")?,
            last_name: PersonName::new(&input.last_name, "Last name")?,
            email: Email::new(input.email)?,
            phone: PhoneNumber::new(&input.phone)?,
        };

        // Policy is checked before the duplicate lookup
        let password = RawPassword::for_registration(input.password)?;

        let exists = bounded::storage(
            self.config.storage_timeout,
            self.repo.exists_by_email(&fields.email),
        )
        .await?;
        if exists {
            tracing::info!(email = %fields.email, "Registration rejected: email already registered");
            return Err(AuthError::Duplicate);
        }

        let credential_hash = bounded::hashing(
            self.config.hashing_timeout,
            self.hasher.clone(),
            move |hasher| hasher.hash(&password),
        )
        .await?;

        let account = Account::register(
            fields,
            credential_hash,
            self.config.password_validity,
            Utc::now(),
        );

        // A concurrent registration can still win the race; create reports Duplicate
        bounded::storage(self.config.storage_timeout, self.repo.create(&account)).await?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            "Account registered"
        );

        Ok(RegisterOutput {
            account_id: account.account_id,
            email: account.email,
        })
    }
}
