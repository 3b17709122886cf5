use std::sync::LazyLock;

use diesel::prelude::*;
use diesel::sql_types::Jsonb;
use diesel::{AsExpression, FromSqlRow};
use jiff_diesel::DateTime;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Three or six digit hex color, leading `#` required.
pub static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("valid hex color regex"));

const INVALID_OPTIONS: &str = "Invalid options provided.";

/// Upper bound of `themes.name` (`VARCHAR(255)`), counted in characters.
pub const MAX_THEME_NAME_LEN: usize = 255;

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|s| s.map(|s| s.trim().to_string()))
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Color document
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct FontColors {
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    #[schema(example = "#182d30")]
    pub primary: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    #[schema(example = "#2f575d")]
    pub secondary: String,
}

impl Default for FontColors {
    fn default() -> Self {
        Self {
            primary: "#182d30".to_string(),
            secondary: "#2f575d".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct SocialIconColors {
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    pub font: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    pub background: String,
}

impl Default for SocialIconColors {
    fn default() -> Self {
        Self {
            font: "#182d30".to_string(),
            background: "#dee1dd".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct VCardButtonColors {
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    pub font: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    pub background: String,
}

impl Default for VCardButtonColors {
    fn default() -> Self {
        Self {
            font: "#dee1dd".to_string(),
            background: "#182d30".to_string(),
        }
    }
}

/// The `color` document of a theme.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Validate,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Jsonb)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemeColor {
    #[validate(nested)]
    pub font: FontColors,
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *HEX_COLOR, message = "Please fill a valid hex color."))]
    #[schema(example = "#dee1dd")]
    pub background: String,
    #[validate(nested)]
    pub social_icons: SocialIconColors,
    #[validate(nested)]
    pub v_card_btn: VCardButtonColors,
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self {
            font: FontColors::default(),
            background: "#dee1dd".to_string(),
            social_icons: SocialIconColors::default(),
            v_card_btn: VCardButtonColors::default(),
        }
    }
}

// ============================================================================
// Display toggles
// ============================================================================

/// Which contact actions a card shows.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Jsonb)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemeDisplay {
    #[serde(default = "default_true")]
    pub phone: bool,
    #[serde(default = "default_true")]
    pub sms: bool,
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default = "default_true")]
    pub web: bool,
    #[serde(default = "default_true")]
    pub address: bool,
    #[serde(default = "default_true")]
    pub map: bool,
    #[serde(default = "default_true")]
    pub v_card_btn: bool,
}

impl Default for ThemeDisplay {
    fn default() -> Self {
        Self {
            phone: true,
            sms: true,
            email: true,
            web: true,
            address: true,
            map: true,
            v_card_btn: true,
        }
    }
}

// ============================================================================
// Logo
// ============================================================================

fn default_logo_height() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct LogoSize {
    #[serde(default = "default_logo_height")]
    #[validate(range(min = 1, message = "Logo height must be at least 1"))]
    #[schema(example = 30)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Logo width must be at least 1"))]
    pub width: Option<u32>,
}

impl Default for LogoSize {
    fn default() -> Self {
        Self {
            height: default_logo_height(),
            width: None,
        }
    }
}

/// Encoded logo renditions, stored as `data:` URIs. Empty until uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct LogoFormat {
    pub png: String,
    pub webp: String,
}

#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Validate,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Jsonb)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeLogo {
    #[validate(nested)]
    pub size: LogoSize,
    pub format: LogoFormat,
}

jsonb_document!(ThemeColor, ThemeDisplay, ThemeLogo);

// ============================================================================
// Rows
// ============================================================================

/// Theme row.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::themes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Theme {
    pub id: i32,
    pub theme_id: String,
    pub name: String,
    pub color: ThemeColor,
    pub display: ThemeDisplay,
    pub logo: ThemeLogo,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Listing projection: just enough to render a theme picker.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::themes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ThemeSummary {
    pub theme_id: String,
    pub name: String,
}

#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::themes)]
pub struct NewTheme {
    pub theme_id: String,
    pub name: String,
    pub color: ThemeColor,
    pub display: ThemeDisplay,
    pub logo: ThemeLogo,
}

impl NewTheme {
    /// A theme with a freshly generated `themeId` and every document at its defaults.
    pub fn new(name: &str) -> AppResult<Self> {
        Self::with_theme_id(Uuid::new_v4().to_string(), name)
    }

    pub fn with_theme_id(theme_id: impl Into<String>, name: &str) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                reason: "Theme name is required".to_string(),
            });
        }
        if name.chars().count() > MAX_THEME_NAME_LEN {
            return Err(AppError::Validation {
                field: "name".to_string(),
                reason: format!("Theme name must be at most {} characters", MAX_THEME_NAME_LEN),
            });
        }

        Ok(Self {
            theme_id: theme_id.into(),
            name: name.to_string(),
            color: ThemeColor::default(),
            display: ThemeDisplay::default(),
            logo: ThemeLogo::default(),
        })
    }
}

// ============================================================================
// Partial updates
// ============================================================================

/// The `logo` part of an options update. Only `size` is ever applied;
/// `format` is accepted and dropped because logo renditions are written by
/// the upload path alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct LogoOptionsUpdate {
    #[validate(nested)]
    pub size: Option<LogoSize>,
    pub format: Option<LogoFormat>,
}

/// Options accepted by a theme update. Unknown keys, including any
/// operator-shaped key such as `$where`, fail deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct ThemeOptionsUpdate {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Theme name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[validate(nested)]
    pub color: Option<ThemeColor>,
    pub display: Option<ThemeDisplay>,
    #[validate(nested)]
    pub logo: Option<LogoOptionsUpdate>,
}

/// Column-level part of an options update; `logo.size` is applied separately
/// as a single sub-path write.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = crate::schema::themes)]
pub struct ThemeChangeset {
    pub name: Option<String>,
    pub color: Option<ThemeColor>,
    pub display: Option<ThemeDisplay>,
}

impl ThemeOptionsUpdate {
    /// Parses raw request JSON. Anything that is not an object, or that
    /// carries keys outside the theme document, is rejected.
    pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
        if !value.is_object() {
            return Err(AppError::BadRequest {
                message: INVALID_OPTIONS.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::debug!(error = %e, "Rejected theme options payload");
            AppError::BadRequest {
                message: INVALID_OPTIONS.to_string(),
            }
        })
    }

    /// Splits the update into the column changeset and the logo size.
    pub fn into_parts(self) -> (ThemeChangeset, Option<LogoSize>) {
        let logo_size = self.logo.and_then(|logo| logo.size);
        let changeset = ThemeChangeset {
            name: self.name,
            color: self.color,
            display: self.display,
        };
        (changeset, logo_size)
    }
}
