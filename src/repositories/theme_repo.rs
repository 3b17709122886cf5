//! Theme repository for async database operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::db::functions::jsonb_set_path;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{LogoFormat, LogoSize, NewTheme, Theme, ThemeChangeset, ThemeSummary};
use crate::utils::contains_pattern;

/// Theme repository holding an async connection pool.
#[derive(Clone)]
pub struct ThemeRepository {
    pool: AsyncDbPool,
}

impl ThemeRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Loads one page of theme summaries ordered by insertion.
    ///
    /// The name filter is applied only for a non-empty `search`; an empty
    /// search lists every theme.
    pub async fn list(
        &self,
        search: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<ThemeSummary>> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut query = themes.select(ThemeSummary::as_select()).into_boxed();
        if !search.is_empty() {
            query = query.filter(name.ilike(contains_pattern(search)));
        }

        query
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(|e| AppError::Database {
                operation: "list themes".to_string(),
                source: anyhow::Error::from(e),
            })
    }

    /// Counts themes whose name contains `search`. The empty search builds
    /// `%%`, which matches every row, so it agrees with [`Self::list`].
    pub async fn count(&self, search: &str) -> AppResult<i64> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        themes
            .filter(name.ilike(contains_pattern(search)))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| AppError::Database {
                operation: "count themes".to_string(),
                source: anyhow::Error::from(e),
            })
    }

    pub async fn find_by_theme_id(&self, tid: &str) -> AppResult<Option<Theme>> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        themes
            .filter(theme_id.eq(tid))
            .select(Theme::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn create(&self, new_theme: NewTheme) -> AppResult<Theme> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(themes)
            .values(&new_theme)
            .returning(Theme::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create theme"))
    }

    /// Applies a column changeset and, when given, replaces `logo.size` in
    /// place. Returns `None` when no theme has `tid`.
    pub async fn update_options(
        &self,
        tid: &str,
        changeset: ThemeChangeset,
        logo_size: Option<LogoSize>,
    ) -> AppResult<Option<Theme>> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        let target = themes.filter(theme_id.eq(tid));
        let result = match logo_size {
            Some(size) => {
                let size_json = serde_json::to_value(&size).map_err(anyhow::Error::from)?;
                diesel::update(target)
                    .set((
                        &changeset,
                        logo.eq(jsonb_set_path(logo, vec!["size".to_string()], size_json)),
                        updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(Theme::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            None => {
                diesel::update(target)
                    .set((&changeset, updated_at.eq(diesel::dsl::now)))
                    .returning(Theme::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        };

        result
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update theme"))
    }

    /// Replaces `logo.format`, leaving `logo.size` untouched.
    pub async fn update_logo_format(
        &self,
        tid: &str,
        format: &LogoFormat,
    ) -> AppResult<Option<Theme>> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        let format_json = serde_json::to_value(format).map_err(anyhow::Error::from)?;
        diesel::update(themes.filter(theme_id.eq(tid)))
            .set((
                logo.eq(jsonb_set_path(logo, vec!["format".to_string()], format_json)),
                updated_at.eq(diesel::dsl::now),
            ))
            .returning(Theme::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Deletes by exact `theme_id` and hands back the removed row, if any.
    pub async fn delete_by_theme_id(&self, tid: &str) -> AppResult<Option<Theme>> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(themes.filter(theme_id.eq(tid)))
            .returning(Theme::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Removes every theme; returns the number of deleted rows.
    pub async fn delete_all(&self) -> AppResult<usize> {
        use crate::schema::themes::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(themes)
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
