//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    NotFound,

    #[error("User Already Exists!")]
    Duplicate,

    #[error("{0}")]
    WeakPassword(String),

    /// Wrong password, account still below the lock threshold
    #[error("Incorrect Password! {attempts_remaining} attempts remaining.")]
    InvalidCredentials { attempts_remaining: u32 },

    #[error("Account is locked. Please try again in {minutes_remaining} minutes.")]
    Locked { minutes_remaining: i64 },

    /// No usable `Authorization: Bearer` header
    #[error("Authentication required")]
    MissingCredential,

    /// Bearer token failed signature, expiry or claim checks
    #[error("Invalid or expired token")]
    InvalidCredential,

    #[error("Admin access required")]
    Forbidden,

    #[error("Storage is temporarily unavailable")]
    StorageUnavailable,

    /// Malformed or incomplete request input
    #[error("{0}")]
    Validation(String),

    #[error("Current password is incorrect")]
    CurrentPasswordMismatch,

    #[error("Password hashing timed out")]
    HashingTimeout,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::Duplicate => ErrorKind::Conflict,
            AuthError::WeakPassword(_) | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials { .. }
            | AuthError::MissingCredential
            | AuthError::InvalidCredential
            | AuthError::CurrentPasswordMismatch => ErrorKind::Unauthorized,
            AuthError::Locked { .. } => ErrorKind::Locked,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::StorageUnavailable | AuthError::HashingTimeout => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError without leaking internals for 5xx
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            AuthError::StorageUnavailable | AuthError::HashingTimeout => {
                AppError::service_unavailable(self.to_string()).with_action("Please retry shortly")
            }
            AuthError::Locked { .. } => AppError::locked(self.to_string())
                .with_action("Wait for the lock to expire or contact support"),
            AuthError::MissingCredential => AppError::unauthorized(self.to_string())
                .with_action("Send an Authorization: Bearer <token> header"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::StorageUnavailable | AuthError::HashingTimeout => {
                tracing::error!(error = %self, "Auth dependency unavailable");
            }
            AuthError::InvalidCredentials { attempts_remaining } => {
                tracing::warn!(attempts_remaining, "Invalid login attempt");
            }
            AuthError::Locked { minutes_remaining } => {
                tracing::warn!(minutes_remaining, "Login attempt on locked account");
            }
            AuthError::InvalidCredential | AuthError::Forbidden => {
                tracing::warn!(error = %self, "Authorization rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                tracing::error!(error = %err, "Storage connection failure");
                AuthError::StorageUnavailable
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::Duplicate,
            _ => AuthError::Database(err),
        }
    }
}

/// Value-object validation failures surface as `Validation`
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
