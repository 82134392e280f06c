use kernel::id::AccountId;

use super::account_role::AccountRole;

/// Authenticated principal attached to a request after bearer verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub account_id: AccountId,
    pub role: AccountRole,
}

impl Identity {
    pub fn new(account_id: AccountId, role: AccountRole) -> Self {
        Self { account_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
