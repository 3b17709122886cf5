//! JWT authentication and role middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UserRole;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated caller, inserted into request extensions by
/// [`auth_middleware`] and read in handlers with `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: claims.user_uuid()?,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })
}

/// Requires a valid bearer access token.
///
/// # Headers
/// Expects: `Authorization: Bearer <token>`
///
/// # Errors
/// 401 when the header is missing or malformed, or the token is invalid,
/// expired or not an access token.
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = validate_access_token(bearer_token(&request)?, &state.jwt_config.secret)?;
    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Requires the caller to be an admin. Must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized {
            message: "Authentication required".to_string(),
        })?;

    if !auth_user.role.is_admin() {
        tracing::debug!(user_uuid = %auth_user.uuid, role = %auth_user.role, "Admin route refused");
        return Err(AppError::Forbidden {
            message: "Admin role required".to_string(),
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenType;
    use crate::utils::jwt::tests::test_user;
    use axum::body::Body;

    #[test]
    fn test_auth_user_from_claims() {
        let user = test_user(UserRole::Admin);
        let claims = Claims::new(&user, TokenType::Access, 1);

        let auth_user = AuthUser::try_from(claims).unwrap();
        assert_eq!(auth_user.uuid, user.uuid);
        assert_eq!(auth_user.email, "ada@example.com");
        assert_eq!(auth_user.name, "Ada");
        assert_eq!(auth_user.role, UserRole::Admin);
    }

    #[test]
    fn test_auth_user_rejects_non_uuid_subject() {
        let mut claims = Claims::new(&test_user(UserRole::User), TokenType::Access, 1);
        claims.sub = "123".to_string();
        assert!(matches!(
            AuthUser::try_from(claims),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request).unwrap(), "abc.def");

        for value in ["Basic abc", "Bearer ", "bearer abc"] {
            let request = Request::builder()
                .header(header::AUTHORIZATION, value)
                .body(Body::empty())
                .unwrap();
            assert!(bearer_token(&request).is_err(), "{value:?} should be rejected");
        }

        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(bearer_token(&request).is_err());
    }
}
