//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::PublicProfile;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Generic `{success, message}` acknowledgement
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    /// Unix milliseconds
    pub expires_at: i64,
    pub profile: ProfileDto,
    /// True once the password has outlived its validity window
    pub password_expired: bool,
}

// ============================================================================
// Profile
// ============================================================================

/// Account fields returned to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: String,
    pub password_expires_at: i64,
}

impl From<PublicProfile> for ProfileDto {
    fn from(profile: PublicProfile) -> Self {
        Self {
            id: profile.account_id.to_string(),
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone: profile.phone,
            role: profile.role.code().to_string(),
            password_expires_at: profile.password_expires_at.timestamp_millis(),
        }
    }
}

/// GET /me response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileDto,
}

// ============================================================================
// Unlock
// ============================================================================

/// Unlock request (admin only)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequest {
    pub email: String,
}

/// Unlock response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockResponse {
    pub success: bool,
    pub message: String,
    pub was_locked: bool,
}

// ============================================================================
// Change Password
// ============================================================================

/// Change password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change password response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordResponse {
    pub success: bool,
    pub message: String,
    pub password_expires_at: i64,
}
