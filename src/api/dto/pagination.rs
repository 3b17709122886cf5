//! Pagination-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::services::PageInfo;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters for the theme listing.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ThemeListQuery {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: i64,

    /// Number of themes per page
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: i64,

    /// Case-insensitive substring of the theme name, matched literally
    #[serde(default)]
    #[validate(length(max = 255, message = "Search query is too long"))]
    #[param(example = "acme")]
    pub search: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Pager counters returned next to a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    #[schema(example = 3)]
    pub total_pages: i64,
    #[schema(example = 3)]
    pub next_page: Option<i64>,
    #[schema(example = 1)]
    pub prev_page: Option<i64>,
}

impl From<PageInfo> for PageLinks {
    fn from(info: PageInfo) -> Self {
        Self {
            total_pages: info.total_pages,
            next_page: info.next_page,
            prev_page: info.prev_page,
        }
    }
}
