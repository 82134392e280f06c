use serde::{Deserialize, Serialize};
use std::fmt;

/// Account privilege level
///
/// Persisted as an `is_admin` flag; carried in bearer tokens as its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    #[default]
    Standard,
    Admin,
}

impl AccountRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountRole::Standard => "standard",
            AccountRole::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }

    #[inline]
    pub const fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            AccountRole::Admin
        } else {
            AccountRole::Standard
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "standard" => Some(AccountRole::Standard),
            "admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for role in [AccountRole::Standard, AccountRole::Admin] {
            assert_eq!(AccountRole::from_code(role.code()), Some(role));
        }
        assert_eq!(AccountRole::from_code("super_admin"), None);
    }

    #[test]
    fn test_admin_flag() {
        assert!(AccountRole::from_is_admin(true).is_admin());
        assert!(!AccountRole::from_is_admin(false).is_admin());
        assert_eq!(AccountRole::default(), AccountRole::Standard);
    }
}
