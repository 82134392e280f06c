//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no business rules:
//! - Cryptographic utilities (HMAC-SHA256, random keys, Base64)
//! - Password hashing (Argon2id) and the complexity policy
//! - Bearer token signing (HS256 JWT)
//! - Client identification and cookie helpers

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod token;
