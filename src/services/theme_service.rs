//! Theme service: paging, lookup, creation, partial updates and logo upload.

use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::ImageConverter;
use crate::models::{NewTheme, Theme, ThemeOptionsUpdate, ThemeSummary};
use crate::repositories::ThemeRepository;

const UPLOAD_FAILED: &str = "Error uploading theme image.";

/// Tallest logo rendition the upload path will produce.
pub const MAX_LOGO_HEIGHT: u32 = 2048;

/// Position of a page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_pages: i64,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
}

impl PageInfo {
    /// `page` is 1-based; `limit` must be positive.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 {
            (total.max(0) as u64).div_ceil(limit as u64) as i64
        } else {
            0
        };

        Self {
            total_pages,
            next_page: (page < total_pages).then_some(page + 1),
            prev_page: (page > 1).then_some(page - 1),
        }
    }
}

/// One page of theme summaries plus the counters a pager needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePage {
    pub themes: Vec<ThemeSummary>,
    pub total_themes: i64,
    pub page: PageInfo,
}

/// Parses the `height` sent alongside a logo upload. Accepts any decimal
/// number, rounds it, and requires the result to be a usable pixel height.
pub fn parse_logo_height(raw: &str) -> AppResult<u32> {
    let invalid = || AppError::Validation {
        field: "height".to_string(),
        reason: format!("Logo height must be a number between 1 and {}", MAX_LOGO_HEIGHT),
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    let rounded = value.round();
    if rounded < 1.0 || rounded > f64::from(MAX_LOGO_HEIGHT) {
        return Err(invalid());
    }
    Ok(rounded as u32)
}

#[derive(Clone)]
pub struct ThemeService {
    repo: ThemeRepository,
    converter: Arc<dyn ImageConverter>,
}

impl ThemeService {
    pub fn new(repo: ThemeRepository, converter: Arc<dyn ImageConverter>) -> Self {
        Self { repo, converter }
    }

    /// Lists theme summaries whose name contains `search`, case-insensitively
    /// and literally.
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `limit` - page size
    /// * `search` - substring to look for; empty lists everything
    pub async fn get_themes_by_page_limit_and_search_query(
        &self,
        page: i64,
        limit: i64,
        search: &str,
    ) -> AppResult<ThemePage> {
        if page < 1 || limit < 1 {
            return Err(AppError::Validation {
                field: if page < 1 { "page" } else { "limit" }.to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let offset = (page - 1).saturating_mul(limit);
        let themes = self.repo.list(search, offset, limit).await?;
        let total_themes = self.repo.count(search).await?;

        tracing::debug!(
            page,
            limit,
            search,
            returned = themes.len(),
            total_themes,
            "Listed themes"
        );

        Ok(ThemePage {
            themes,
            total_themes,
            page: PageInfo::new(page, limit, total_themes),
        })
    }

    pub async fn get_theme_by_id(&self, theme_id: &str) -> AppResult<Theme> {
        self.repo
            .find_by_theme_id(theme_id)
            .await?
            .ok_or_else(|| AppError::theme_not_found(theme_id))
    }

    /// Creates a theme from a name alone; every other document starts at
    /// its defaults.
    pub async fn create_theme(&self, name: &str) -> AppResult<Theme> {
        let theme = self.repo.create(NewTheme::new(name)?).await?;
        tracing::info!(theme_id = %theme.theme_id, name = %theme.name, "Theme created");
        Ok(theme)
    }

    /// Applies a partial update given as raw JSON.
    ///
    /// Only `logo.size` is taken from a `logo` fragment.
    pub async fn update_theme_options_by_id(
        &self,
        theme_id: &str,
        options: serde_json::Value,
    ) -> AppResult<Theme> {
        let update = ThemeOptionsUpdate::from_value(options)?;
        update.validate()?;

        let (changeset, logo_size) = update.into_parts();
        let theme = self
            .repo
            .update_options(theme_id, changeset, logo_size)
            .await?
            .ok_or_else(|| AppError::theme_not_found(theme_id))?;

        tracing::info!(theme_id, "Theme options updated");
        Ok(theme)
    }

    /// Converts an uploaded logo and stores its renditions.
    ///
    /// Every failure, including an unknown theme, is reported as the same
    /// upload error; the cause is only logged.
    pub async fn update_theme_logo_by_id(
        &self,
        theme_id: &str,
        image: Vec<u8>,
        image_height: &str,
    ) -> AppResult<Theme> {
        match self.store_logo(theme_id, image, image_height).await {
            Ok(theme) => {
                tracing::info!(theme_id, "Theme logo updated");
                Ok(theme)
            }
            Err(e) => {
                tracing::warn!(theme_id, error = ?e, "Theme logo upload failed");
                Err(AppError::UnprocessableContent {
                    message: UPLOAD_FAILED.to_string(),
                })
            }
        }
    }

    async fn store_logo(&self, theme_id: &str, image: Vec<u8>, image_height: &str) -> AppResult<Theme> {
        let height = parse_logo_height(image_height)?;
        let format = self.converter.convert(image, height).await?;

        self.repo
            .update_logo_format(theme_id, &format)
            .await?
            .ok_or_else(|| AppError::theme_not_found(theme_id))
    }

    /// Deletes by exact id. A missing theme is `Ok(None)`.
    pub async fn delete_theme_by_id(&self, theme_id: &str) -> AppResult<Option<Theme>> {
        let deleted = self.repo.delete_by_theme_id(theme_id).await?;
        if deleted.is_some() {
            tracing::info!(theme_id, "Theme deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_info_middle_page() {
        assert_eq!(
            PageInfo::new(2, 10, 25),
            PageInfo {
                total_pages: 3,
                next_page: Some(3),
                prev_page: Some(1),
            }
        );
    }

    #[test]
    fn test_page_info_boundaries() {
        let first = PageInfo::new(1, 10, 25);
        assert_eq!(first.prev_page, None);
        assert_eq!(first.next_page, Some(2));

        let last = PageInfo::new(3, 10, 25);
        assert_eq!(last.next_page, None);
        assert_eq!(last.prev_page, Some(2));

        let empty = PageInfo::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.next_page, None);
        assert_eq!(empty.prev_page, None);
    }

    #[test]
    fn test_page_past_the_end_still_links_back() {
        let info = PageInfo::new(9, 10, 25);
        assert_eq!(info.next_page, None);
        assert_eq!(info.prev_page, Some(8));
    }

    #[test]
    fn test_parse_logo_height() {
        assert_eq!(parse_logo_height("30").unwrap(), 30);
        assert_eq!(parse_logo_height(" 42 ").unwrap(), 42);
        assert_eq!(parse_logo_height("29.6").unwrap(), 30);
        assert_eq!(parse_logo_height("1e2").unwrap(), 100);

        for bad in ["", "abc", "0", "0.4", "-5", "NaN", "inf", "4096"] {
            assert!(
                matches!(parse_logo_height(bad), Err(AppError::Validation { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(limit in 1i64..500, total in 0i64..100_000) {
            let info = PageInfo::new(1, limit, total);
            prop_assert_eq!(info.total_pages, (total + limit - 1) / limit);
            prop_assert!(info.total_pages * limit >= total);
            prop_assert!((info.total_pages - 1).max(0) * limit < total.max(1));
        }

        #[test]
        fn prop_links_are_null_exactly_at_boundaries(
            limit in 1i64..100,
            total in 1i64..10_000,
            page_seed in 0i64..1000,
        ) {
            let total_pages = (total + limit - 1) / limit;
            let page = page_seed % total_pages + 1;
            let info = PageInfo::new(page, limit, total);

            prop_assert_eq!(info.prev_page.is_none(), page == 1);
            prop_assert_eq!(info.next_page.is_none(), page == total_pages);
            if let Some(next) = info.next_page {
                prop_assert_eq!(next, page + 1);
            }
            if let Some(prev) = info.prev_page {
                prop_assert_eq!(prev, page - 1);
            }
        }

        #[test]
        fn prop_integral_heights_parse_exactly(height in 1u32..=MAX_LOGO_HEIGHT) {
            prop_assert_eq!(parse_logo_height(&height.to_string()).unwrap(), height);
        }
    }
}
