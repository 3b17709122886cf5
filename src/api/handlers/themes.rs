//! Theme endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::THEME_TAG;
use crate::api::dto::{
    CreateThemeRequest, LogoUploadQuery, ThemeListQuery, ThemeListResponse, ThemeResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::ThemeOptionsUpdate;
use crate::state::AppState;
use crate::utils::{ValidatedJson, ValidatedQuery};

/// Routes any authenticated caller may use.
///
/// # Routes
/// - `GET /themes` - Paged, searchable listing
/// - `GET /themes/{themeId}` - One theme
pub fn theme_read_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_themes))
        .routes(routes!(get_theme))
}

/// Routes reserved to admins.
///
/// # Routes
/// - `POST /themes` - Create
/// - `PATCH /themes/{themeId}` - Partial update
/// - `DELETE /themes/{themeId}` - Delete
/// - `PUT /themes/{themeId}/logo` - Upload a logo
pub fn theme_admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_theme))
        .routes(routes!(update_theme, delete_theme))
        .routes(routes!(upload_logo))
}

#[utoipa::path(
    get,
    path = "/themes",
    tag = THEME_TAG,
    params(ThemeListQuery),
    responses(
        (status = 200, description = "One page of themes", body = ThemeListResponse),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearerAuth" = []))
)]
async fn list_themes(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ThemeListQuery>,
) -> AppResult<Json<ThemeListResponse>> {
    let page = state
        .services
        .themes
        .get_themes_by_page_limit_and_search_query(query.page, query.limit, &query.search)
        .await?;

    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/themes/{themeId}",
    tag = THEME_TAG,
    params(("themeId" = String, Path, description = "Public theme id")),
    responses(
        (status = 200, description = "Theme", body = ThemeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Theme not found.")
    ),
    security(("bearerAuth" = []))
)]
async fn get_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
) -> AppResult<Json<ThemeResponse>> {
    let theme = state.services.themes.get_theme_by_id(&theme_id).await?;
    Ok(Json(theme.into()))
}

#[utoipa::path(
    post,
    path = "/themes",
    tag = THEME_TAG,
    request_body = CreateThemeRequest,
    responses(
        (status = 201, description = "Theme created with default colors, display and logo", body = ThemeResponse),
        (status = 400, description = "Invalid request data"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearerAuth" = []))
)]
async fn create_theme(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateThemeRequest>,
) -> AppResult<(StatusCode, Json<ThemeResponse>)> {
    let theme = state.services.themes.create_theme(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(theme.into())))
}

#[utoipa::path(
    patch,
    path = "/themes/{themeId}",
    tag = THEME_TAG,
    params(("themeId" = String, Path, description = "Public theme id")),
    request_body = ThemeOptionsUpdate,
    responses(
        (status = 200, description = "Updated theme", body = ThemeResponse),
        (status = 400, description = "Invalid options provided."),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Theme not found.")
    ),
    security(("bearerAuth" = []))
)]
async fn update_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ThemeResponse>> {
    let Json(options) = payload?;
    let theme = state
        .services
        .themes
        .update_theme_options_by_id(&theme_id, options)
        .await?;

    Ok(Json(theme.into()))
}

#[utoipa::path(
    delete,
    path = "/themes/{themeId}",
    tag = THEME_TAG,
    params(("themeId" = String, Path, description = "Public theme id")),
    responses(
        (status = 200, description = "The deleted theme", body = ThemeResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Theme not found.")
    ),
    security(("bearerAuth" = []))
)]
async fn delete_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
) -> AppResult<Json<ThemeResponse>> {
    state
        .services
        .themes
        .delete_theme_by_id(&theme_id)
        .await?
        .map(|theme| Json(theme.into()))
        .ok_or_else(|| AppError::theme_not_found(&theme_id))
}

/// The body is the raw image (PNG, JPEG, WebP or GIF).
#[utoipa::path(
    put,
    path = "/themes/{themeId}/logo",
    tag = THEME_TAG,
    params(
        ("themeId" = String, Path, description = "Public theme id"),
        LogoUploadQuery
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Theme with the new logo renditions", body = ThemeResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 422, description = "Error uploading theme image.")
    ),
    security(("bearerAuth" = []))
)]
async fn upload_logo(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<LogoUploadQuery>,
    image: Bytes,
) -> AppResult<Json<ThemeResponse>> {
    let theme = state
        .services
        .themes
        .update_theme_logo_by_id(&theme_id, image.to_vec(), &query.height)
        .await?;

    Ok(Json(theme.into()))
}
