//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::UserResponse;
use crate::models::UserRole;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "admin@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    #[schema(example = "password123", format = "password")]
    pub password: String,
}

/// Account creation payload, admin only
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Ada Lovelace", min_length = 1, max_length = 100)]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(example = "correct horse battery", format = "password", min_length = 8, max_length = 128)]
    pub password: String,
    /// Defaults to `user`
    #[serde(default)]
    pub role: UserRole,
    #[validate(length(min = 1, max = 255, message = "Theme id must not be empty"))]
    #[schema(example = "1")]
    pub theme_id: Option<String>,
}

/// Password recovery payload, admin only
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecoverRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com", format = "email")]
    pub email: String,
}

/// Password reset payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ResetRequest {
    #[validate(length(min = 1, message = "Reset token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(format = "password", min_length = 8, max_length = 128)]
    pub password: String,
}

/// Refresh token request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Login response with user info and tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    /// Access token (short-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    /// Refresh token (long-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Refresh token response with new tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshTokenResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Reset token handed to the admin who started a recovery
#[derive(Debug, Serialize, ToSchema)]
pub struct RecoverResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub reset_token: String,
    /// Lifetime of the token in hours
    #[schema(example = 1)]
    pub expires_in_hours: i64,
}
