//! Authentication handlers: account creation, login, recovery and token refresh.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    LoginRequest, LoginResponse, RecoverRequest, RecoverResponse, RefreshTokenRequest,
    RefreshTokenResponse, ResetRequest, SignupRequest, UserResponse,
};
use crate::error::AppResult;
use crate::services::CreateUser;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Routes open to anonymous callers.
///
/// # Routes
/// - `POST /auth/login` - Authenticate and get tokens
/// - `PUT /auth/reset` - Set a new password with a reset token
/// - `POST /auth/refresh` - Exchange a refresh token for a new pair
pub fn public_auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(reset))
        .routes(routes!(refresh_token))
}

/// Routes that require an admin access token.
///
/// # Routes
/// - `POST /auth/signup` - Create an account
/// - `POST /auth/recover` - Issue a password reset token
pub fn admin_auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(signup))
        .routes(routes!(recover))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = AUTH_TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "E-mail already registered")
    ),
    security(("bearerAuth" = []))
)]
async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .services
        .users
        .create_user(CreateUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            theme_id: payload.theme_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Invalid credentials")
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (user, access_token, refresh_token) = state
        .services
        .users
        .authenticate(&payload.email, &payload.password, &state.jwt_config)
        .await?;

    Ok(Json(LoginResponse {
        user: user.into(),
        access_token,
        refresh_token,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/recover",
    tag = AUTH_TAG,
    request_body = RecoverRequest,
    responses(
        (status = 200, description = "Reset token issued", body = RecoverResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No account with that e-mail")
    ),
    security(("bearerAuth" = []))
)]
async fn recover(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RecoverRequest>,
) -> AppResult<Json<RecoverResponse>> {
    let reset_token = state
        .services
        .users
        .issue_reset_token(&payload.email, &state.jwt_config)
        .await?;

    Ok(Json(RecoverResponse {
        reset_token,
        expires_in_hours: state.jwt_config.reset_token_expiration,
    }))
}

#[utoipa::path(
    put,
    path = "/auth/reset",
    tag = AUTH_TAG,
    request_body = ResetRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Invalid or expired reset token")
    )
)]
async fn reset(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetRequest>,
) -> AppResult<StatusCode> {
    state
        .services
        .users
        .reset_password(&payload.token, &payload.password, &state.jwt_config)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<RefreshTokenResponse>> {
    let (access_token, refresh_token) = state
        .services
        .users
        .refresh(&payload.refresh_token, &state.jwt_config)
        .await?;

    Ok(Json(RefreshTokenResponse {
        access_token,
        refresh_token,
    }))
}
