//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, ProfileUseCase, RegisterInput, RegisterUseCase,
    SignInInput, SignInUseCase, UnlockInput, UnlockUseCase,
};
use crate::domain::repository::AccountRepository;
use crate::domain::service::{PasswordHasher, TokenIssuer};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, ChangePasswordResponse, LoginRequest, LoginResponse, MessageResponse,
    ProfileResponse, RegisterRequest, UnlockRequest, UnlockResponse,
};
use crate::presentation::extract::{CurrentIdentity, ValidatedJson};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/user/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password: req.password,
        phone: req.phone,
    };

    use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("User registered successfully")),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/user/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: output.token,
        expires_at: output.expires_at.timestamp_millis(),
        profile: output.profile.into(),
        password_expired: output.password_expired,
    }))
}

// ============================================================================
// Current Account
// ============================================================================

/// GET /api/user/me (bearer)
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> AuthResult<Json<ProfileResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let profile = use_case.execute(&identity).await?;

    Ok(Json(ProfileResponse {
        success: true,
        profile: profile.into(),
    }))
}

// ============================================================================
// Unlock (admin)
// ============================================================================

/// POST /api/user/unlock (admin bearer)
pub async fn unlock<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(actor): CurrentIdentity,
    ValidatedJson(req): ValidatedJson<UnlockRequest>,
) -> AuthResult<Json<UnlockResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = UnlockUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(&actor, UnlockInput { email: req.email })
        .await?;

    Ok(Json(UnlockResponse {
        success: true,
        message: format!("Account {} unlocked", output.email),
        was_locked: output.was_locked,
    }))
}

// ============================================================================
// Change Password
// ============================================================================

/// POST /api/user/change-password (bearer)
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(identity): CurrentIdentity,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AuthResult<Json<ChangePasswordResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            &identity,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(ChangePasswordResponse {
        success: true,
        message: "Password changed successfully".to_string(),
        password_expires_at: output.password_expires_at.timestamp_millis(),
    }))
}
