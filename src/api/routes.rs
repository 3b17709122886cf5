//! Router configuration for the API.
//!
//! Route groups carry their own guards: public, authenticated, and
//! authenticated admin. All of them are merged under `/api`, with the
//! OpenAPI document served by Swagger UI.

use std::time::Duration;

use axum::http::StatusCode;
use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{auth, health, me, themes};
use crate::api::middleware::{
    admin_middleware, auth_middleware, global_error_handler, logging_middleware,
    request_id_middleware,
};
use crate::state::AppState;

/// Largest accepted request body, sized for logo uploads.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Builds the `/api` routes and the OpenAPI document describing them.
pub fn api_router(state: &AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .merge(health::health_routes())
        .merge(auth::public_auth_routes());

    let authenticated = OpenApiRouter::new()
        .merge(me::me_routes())
        .merge(themes::theme_read_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Last added runs first: token check, then role check
    let admin = OpenApiRouter::new()
        .merge(auth::admin_auth_routes())
        .merge(themes::theme_admin_routes())
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    OpenApiRouter::with_openapi(ApiDoc::openapi()).nest(
        "/api",
        OpenApiRouter::new()
            .merge(public)
            .merge(authenticated)
            .merge(admin),
    )
}

/// Creates the main application router with all routes and middleware.
///
/// A request still running after `request_timeout` is answered with 408.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let (router, openapi) = api_router(&state).split_for_parts();

    with_middleware(
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi)),
        request_timeout,
    )
    .with_state(state)
}

/// Shared middleware stack.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests with request IDs
/// 3. Error handler - stamps request IDs on error bodies, timeouts included
fn with_middleware(router: Router<AppState>, request_timeout: Duration) -> Router<AppState> {
    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::ErrorResponse;
    use crate::models::UserRole;
    use crate::state::tests::test_state;
    use crate::utils::jwt::tests::{TEST_SECRET, test_user};
    use crate::utils::jwt::{TokenType, generate_token};
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use axum::response::Response;
    use axum::routing::get;
    use tower::ServiceExt;

    const TEST_TIMEOUT: Duration = Duration::from_secs(30);

    fn token(role: UserRole, token_type: TokenType) -> String {
        generate_token(&test_user(role), token_type, TEST_SECRET, 1).unwrap()
    }

    async fn send(request: Request<Body>) -> Response {
        create_router(test_state(), TEST_TIMEOUT).oneshot(request).await.unwrap()
    }

    async fn error_body(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: Method, uri: &str, bearer: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_liveness_is_public() {
        let response = send(request(Method::GET, "/api/health/live", None, "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_themes_require_token() {
        let response = send(request(Method::GET, "/api/themes", None, "")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = error_body(response).await;
        assert_eq!(body.code, "UNAUTHORIZED");
        assert!(body.request_id.is_some());
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let refresh = token(UserRole::Admin, TokenType::Refresh);
        let response = send(request(Method::GET, "/api/me", Some(&refresh), "")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_requires_admin() {
        let user_token = token(UserRole::User, TokenType::Access);
        let body = r#"{"name":"Bob","email":"bob@example.com","password":"long enough"}"#;

        let response = send(request(Method::POST, "/api/auth/signup", Some(&user_token), body)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(request(Method::POST, "/api/auth/signup", None, body)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_theme_writes_require_admin() {
        let user_token = token(UserRole::User, TokenType::Access);
        for (method, uri) in [
            (Method::POST, "/api/themes"),
            (Method::PATCH, "/api/themes/1"),
            (Method::DELETE, "/api/themes/1"),
            (Method::PUT, "/api/themes/1/logo?height=30"),
        ] {
            let response = send(request(method.clone(), uri, Some(&user_token), "{}")).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_list_query_is_validated_before_the_database() {
        let access = token(UserRole::User, TokenType::Access);
        let response = send(request(Method::GET, "/api/themes?page=0", Some(&access), "")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.details.unwrap()["errors"][0]["field"], "page");
    }

    #[tokio::test]
    async fn test_login_body_is_validated() {
        let response = send(request(
            Method::POST,
            "/api/auth/login",
            None,
            r#"{"email":"not-an-email","password":"x"}"#,
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_theme_update_rejects_operator_keys_before_the_database() {
        let admin = token(UserRole::Admin, TokenType::Access);
        let response = send(request(
            Method::PATCH,
            "/api/themes/t1",
            Some(&admin),
            r#"{"name":"x","$where":"sleep(1000)"}"#,
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await.message, "Invalid options provided.");
    }

    #[tokio::test]
    async fn test_reset_with_access_token_is_unauthorized() {
        let access = token(UserRole::User, TokenType::Access);
        let body = format!(r#"{{"token":"{}","password":"long enough"}}"#, access);
        let response = send(request(Method::PUT, "/api/auth/reset", None, &body)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let response = send(request(Method::GET, "/api/nope", None, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_body(response).await.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_json_body() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let response = with_middleware(slow, Duration::from_millis(20))
            .with_state(test_state())
            .oneshot(request(Method::GET, "/slow", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = error_body(response).await;
        assert_eq!(body.code, "REQUEST_TIMEOUT");
        assert!(body.request_id.is_some());
    }

    #[tokio::test]
    async fn test_openapi_lists_every_route() {
        let (_, openapi) = api_router(&test_state()).split_for_parts();
        let paths: Vec<&str> = openapi.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/auth/login",
            "/api/auth/signup",
            "/api/auth/recover",
            "/api/auth/reset",
            "/api/auth/refresh",
            "/api/me",
            "/api/themes",
            "/api/themes/{themeId}",
            "/api/themes/{themeId}/logo",
            "/api/health",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
