//! Profile Use Case
//!
//! Public profile of the authenticated account.

use std::sync::Arc;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::application::sign_in::PublicProfile;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::identity::Identity;
use crate::error::{AuthError, AuthResult};

pub struct ProfileUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, identity: &Identity) -> AuthResult<PublicProfile> {
        let account = bounded::storage(
            self.config.storage_timeout,
            self.repo.find_by_id(&identity.account_id),
        )
        .await?
        .ok_or(AuthError::NotFound)?;

        Ok(PublicProfile::from(&account))
    }
}
