use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::{Jsonb, Text};
use diesel::{AsExpression, FromSqlRow};
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::io::Write;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Enums
// ============================================================================

/// Role of an account. Admins manage themes and other accounts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Unrecognized role: {}", s)),
        }
    }
}

impl diesel::query_builder::QueryId for UserRole {
    type QueryId = UserRole;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for UserRole {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        Ok(s.parse::<UserRole>()?)
    }
}

// ============================================================================
// vCard
// ============================================================================

/// Profile sections shown on a card. Sections start empty and are filled in
/// by profile editing; their inner keys are free-form.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Jsonb)]
#[serde(default, rename_all = "camelCase")]
pub struct VCard {
    #[schema(value_type = Object)]
    pub person: Map<String, JsonValue>,
    #[schema(value_type = Object)]
    pub professional: Map<String, JsonValue>,
    #[schema(value_type = Object)]
    pub contact: Map<String, JsonValue>,
    #[schema(value_type = Object)]
    pub location: Map<String, JsonValue>,
    #[schema(value_type = Object)]
    pub social_media: Map<String, JsonValue>,
    #[schema(value_type = Object)]
    pub avatar: Map<String, JsonValue>,
}

jsonb_document!(VCard);

// ============================================================================
// Rows
// ============================================================================

/// User row. `theme_id` refers to `themes.theme_id` and may dangle.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub theme_id: Option<String>,
    pub v_card: VCard,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub theme_id: Option<String>,
    pub v_card: VCard,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub theme_id: Option<Option<String>>,
    pub v_card: Option<VCard>,
}
