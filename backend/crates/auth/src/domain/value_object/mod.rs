//! Value Object Module

pub mod account_role;
pub mod email;
pub mod identity;
pub mod password;
pub mod profile;
