//! Time-bounded calls to storage and the password hasher
//!
//! Both are the only suspension points in the use cases; each gets a
//! caller-visible deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::service::PasswordHasher;
use crate::error::{AuthError, AuthResult};

/// Await a repository call, mapping a missed deadline to `StorageUnavailable`
pub(crate) async fn storage<T, F>(limit: Duration, call: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(timeout_ms = limit.as_millis() as u64, "Storage call timed out");
            Err(AuthError::StorageUnavailable)
        }
    }
}

/// Run a hashing operation on the blocking pool with a deadline
pub(crate) async fn hashing<T, F>(
    limit: Duration,
    hasher: Arc<dyn PasswordHasher>,
    op: F,
) -> AuthResult<T>
where
    F: FnOnce(&dyn PasswordHasher) -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || op(hasher.as_ref()));

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(AuthError::Internal(format!(
            "Hashing task failed: {join_err}"
        ))),
        Err(_) => {
            tracing::error!(timeout_ms = limit.as_millis() as u64, "Password hashing timed out");
            Err(AuthError::HashingTimeout)
        }
    }
}
