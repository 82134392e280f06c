//! Domain Entities

pub mod account;
pub mod session_fingerprint;
