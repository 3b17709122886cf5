//! Theme DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{PageLinks, format_timestamp};
use crate::models::{Theme, ThemeColor, ThemeDisplay, ThemeLogo, ThemeSummary};
use crate::services::ThemePage;

/// Request body for creating a theme. Only the name is taken from input.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateThemeRequest {
    #[validate(length(min = 1, max = 255, message = "Theme name must be between 1 and 255 characters"))]
    #[schema(example = "Acme", min_length = 1, max_length = 255)]
    pub name: String,
}

/// Query string of a logo upload.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct LogoUploadQuery {
    /// Target height in pixels; decimals are rounded
    #[validate(length(min = 1, max = 32, message = "Height is required"))]
    #[param(example = "30")]
    pub height: String,
}

/// Full theme document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResponse {
    #[schema(example = "4f1f8c5e-0b1e-4e59-9d8e-3c2b6f0e7a10")]
    pub theme_id: String,
    #[schema(example = "Acme")]
    pub name: String,
    pub color: ThemeColor,
    pub display: ThemeDisplay,
    pub logo: ThemeLogo,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            created_at: format_timestamp(&theme.created_at),
            updated_at: format_timestamp(&theme.updated_at),
            theme_id: theme.theme_id,
            name: theme.name,
            color: theme.color,
            display: theme.display,
            logo: theme.logo,
        }
    }
}

/// Listing entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSummaryResponse {
    pub theme_id: String,
    pub name: String,
}

impl From<ThemeSummary> for ThemeSummaryResponse {
    fn from(summary: ThemeSummary) -> Self {
        Self {
            theme_id: summary.theme_id,
            name: summary.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeListResponse {
    pub themes: Vec<ThemeSummaryResponse>,
    #[schema(example = 25)]
    pub total_themes: i64,
    #[serde(flatten)]
    pub links: PageLinks,
}

impl From<ThemePage> for ThemeListResponse {
    fn from(page: ThemePage) -> Self {
        Self {
            themes: page.themes.into_iter().map(Into::into).collect(),
            total_themes: page.total_themes,
            links: page.page.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PageInfo;
    use serde_json::json;

    #[test]
    fn test_list_response_shape() {
        let page = ThemePage {
            themes: vec![ThemeSummary {
                theme_id: "t1".to_string(),
                name: "Acme".to_string(),
            }],
            total_themes: 25,
            page: PageInfo::new(2, 10, 25),
        };

        assert_eq!(
            serde_json::to_value(ThemeListResponse::from(page)).unwrap(),
            json!({
                "themes": [{ "themeId": "t1", "name": "Acme" }],
                "totalThemes": 25,
                "totalPages": 3,
                "nextPage": 3,
                "prevPage": 1
            })
        );
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateThemeRequest = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(request.validate().is_err());
    }
}
