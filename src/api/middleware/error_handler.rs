//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as a JSON [`ErrorResponse`]. The
//! [`global_error_handler`] middleware then stamps the request id on it and
//! turns framework-generated error bodies (unknown route, wrong method,
//! oversized body) into the same shape.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Maps an AppError variant to its status code and client-facing body.
/// Database, configuration and internal failures never leak their source.
pub fn error_parts(error: &AppError) -> (StatusCode, ErrorResponse) {
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found_error(entity, field, value),
        ),
        AppError::Duplicate {
            entity,
            field,
            value,
        } => (
            StatusCode::CONFLICT,
            ErrorResponse::duplicate_error(entity, field, value),
        ),
        AppError::Validation { field, reason } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_error(field, reason),
        ),
        AppError::ValidationErrors { errors } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_errors(errors),
        ),
        AppError::BadRequest { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_REQUEST", message),
        ),
        AppError::UnprocessableContent { message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::new("UNPROCESSABLE_CONTENT", message),
        ),
        AppError::Unauthorized { message } => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("UNAUTHORIZED", message),
        ),
        AppError::Forbidden { message } => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("FORBIDDEN", message),
        ),
        AppError::Database { operation, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {}", operation),
            ),
        ),
        AppError::Configuration { key, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key)),
        ),
        AppError::ConnectionPool { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable"),
        ),
        AppError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = error_parts(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

fn fallback_body(status: StatusCode) -> ErrorResponse {
    match status {
        StatusCode::NOT_FOUND => {
            ErrorResponse::new("NOT_FOUND", "The requested resource was not found")
        }
        StatusCode::METHOD_NOT_ALLOWED => ErrorResponse::new(
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::PAYLOAD_TOO_LARGE => {
            ErrorResponse::new("PAYLOAD_TOO_LARGE", "Request payload too large")
        }
        StatusCode::REQUEST_TIMEOUT => {
            ErrorResponse::new("REQUEST_TIMEOUT", "Request took too long to complete")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            ErrorResponse::new("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type")
        }
        s if s.is_server_error() => {
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
        }
        _ => ErrorResponse::new("BAD_REQUEST", "Bad request - invalid or malformed request"),
    }
}

/// Gives every error response the [`ErrorResponse`] shape and the request id.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let body = match response.extensions().get::<ErrorResponse>() {
        Some(body) => body.clone(),
        None => {
            let is_json = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("application/json"));
            if is_json {
                return response;
            }
            fallback_body(status)
        }
    };

    let body = match request_id {
        Some(RequestId(id)) => body.with_request_id(&id),
        None => body,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    let rendered = Json(body).into_response();
    let (rendered_parts, rendered_body) = rendered.into_parts();
    parts.headers.extend(rendered_parts.headers);
    Response::from_parts(parts, rendered_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::request_id_middleware;
    use crate::error::ValidationFieldError;
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    fn status_of(error: AppError) -> (StatusCode, String) {
        let (status, body) = error_parts(&error);
        (status, body.code)
    }

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (
                AppError::theme_not_found("t1"),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                AppError::Duplicate {
                    entity: "user".to_string(),
                    field: "email".to_string(),
                    value: "a@b.io".to_string(),
                },
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
            ),
            (
                AppError::Validation {
                    field: "name".to_string(),
                    reason: "required".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::ValidationErrors { errors: Vec::new() },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::BadRequest {
                    message: "Invalid options provided.".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
            ),
            (
                AppError::UnprocessableContent {
                    message: "Error uploading theme image.".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_CONTENT",
            ),
            (
                AppError::Unauthorized {
                    message: "no".to_string(),
                },
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
            (
                AppError::Forbidden {
                    message: "no".to_string(),
                },
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("Pool exhausted"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(status_of(error), (status, code.to_string()));
        }
    }

    #[test]
    fn test_theme_not_found_message() {
        let (_, body) = error_parts(&AppError::theme_not_found("t1"));
        assert_eq!(body.message, "Theme not found.");
    }

    #[test]
    fn test_sources_are_not_exposed() {
        let (_, body) = error_parts(&AppError::Database {
            operation: "list themes".to_string(),
            source: anyhow::anyhow!("password authentication failed for user vcard"),
        });
        assert_eq!(body.message, "Database operation failed: list themes");
        assert!(body.details.is_none());
    }

    async fn read_json(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/fails",
                get(|| async {
                    Err::<(), _>(AppError::ValidationErrors {
                        errors: vec![ValidationFieldError {
                            field: "name".to_string(),
                            code: "length".to_string(),
                            message: "Theme name is required".to_string(),
                        }],
                    })
                }),
            )
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_app_error_gets_request_id() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/fails")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.request_id.as_deref(), Some("req-42"));
        assert_eq!(body.details.unwrap()["errors"][0]["field"], "name");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json() {
        let response = test_router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = read_json(response).await;
        assert_eq!(body.code, "NOT_FOUND");
        assert!(body.request_id.is_some());
    }
}
