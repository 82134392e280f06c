//! Infrastructure Layer
//!
//! Storage adapters and the concrete hasher / token issuer.

pub mod argon2;
pub mod jwt;
pub mod memory;
pub mod postgres;

pub use argon2::Argon2PasswordHasher;
pub use jwt::JwtTokenIssuer;
pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
