//! Application Layer
//!
//! Use cases and application services.

pub mod authorize;
pub(crate) mod bounded;
pub mod change_password;
pub mod config;
pub mod profile;
pub mod register;
pub mod session_activity;
pub mod session_token;
pub mod sign_in;
pub mod unlock;

// Re-exports
pub use authorize::{AccessLevel, authorize};
pub use change_password::{ChangePasswordInput, ChangePasswordOutput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use profile::ProfileUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use session_activity::{Observation, SessionActivityTracker, SweepReport};
pub use sign_in::{PublicProfile, SignInInput, SignInOutput, SignInUseCase};
pub use unlock::{UnlockInput, UnlockOutput, UnlockUseCase};
