//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - Signup, login, recovery and token DTOs
//! - `theme` - Theme request/response DTOs
//! - `user` - User response DTO
//! - `error` - Common error response DTOs
//! - `pagination` - Listing query and pager counters
//! - `health` - Health check DTOs

mod auth;
mod error;
mod health;
mod pagination;
mod theme;
mod user;

pub use auth::{
    LoginRequest, LoginResponse, RecoverRequest, RecoverResponse, RefreshTokenRequest,
    RefreshTokenResponse, ResetRequest, SignupRequest,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, PageLinks, ThemeListQuery};
pub use theme::{
    CreateThemeRequest, LogoUploadQuery, ThemeListResponse, ThemeResponse, ThemeSummaryResponse,
};
pub use user::UserResponse;

/// Stored timestamps are UTC wall-clock values.
pub(crate) fn format_timestamp(value: &jiff_diesel::DateTime) -> String {
    value.to_jiff().strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}
