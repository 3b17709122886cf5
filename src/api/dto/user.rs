//! User-related DTOs for API responses.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::format_timestamp;
use crate::models::{User, UserRole, VCard};

/// Response body for user data. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub uuid: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub role: UserRole,
    #[schema(example = "1")]
    pub theme_id: Option<String>,
    pub v_card: VCard,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            role: user.role,
            theme_id: user.theme_id,
            v_card: user.v_card,
        }
    }
}
