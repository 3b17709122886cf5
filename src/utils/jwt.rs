use jiff::Timestamp;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserRole};

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new access tokens (long-lived)
    Refresh,
    /// Short-lived password reset token issued by recovery
    Reset,
}

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user uuid)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user, valid for `expiration_hours` from now.
    pub fn new(user: &User, token_type: TokenType, expiration_hours: i64) -> Self {
        let iat = Timestamp::now().as_second();

        Self {
            sub: user.uuid.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            token_type,
            iat,
            exp: iat + expiration_hours * 3600,
        }
    }

    /// Parses the subject back into the user uuid.
    pub fn user_uuid(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Unauthorized {
            message: "Invalid token subject".to_string(),
        })
    }
}

/// Generates a signed HS256 token for a user
pub fn generate_token(
    user: &User,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Generates both access and refresh tokens
///
/// # Returns
/// A tuple of (access_token, refresh_token)
pub fn generate_token_pair(user: &User, config: &JwtConfig) -> AppResult<(String, String)> {
    let access_token = generate_token(
        user,
        TokenType::Access,
        &config.secret,
        config.access_token_expiration,
    )?;
    let refresh_token = generate_token(
        user,
        TokenType::Refresh,
        &config.secret,
        config.refresh_token_expiration,
    )?;

    Ok((access_token, refresh_token))
}

/// Generates a password reset token
pub fn generate_reset_token(user: &User, config: &JwtConfig) -> AppResult<String> {
    generate_token(
        user,
        TokenType::Reset,
        &config.secret,
        config.reset_token_expiration,
    )
}

/// Validates and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to validate
/// * `secret` - The secret key for verifying the token
/// * `expected_type` - Token type the caller requires
pub fn validate_token(token: &str, secret: &str, expected_type: TokenType) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
    })?;

    if claims.token_type != expected_type {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected_type, claims.token_type
            ),
        });
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, TokenType::Access)
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, TokenType::Refresh)
}

pub fn validate_reset_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, TokenType::Reset)
}
