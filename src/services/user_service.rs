//! User service for account and credential operations.
//!
//! Passwords are hashed here, never in handlers, and token issuing is
//! driven by the `[jwt]` settings passed in by the caller.

use uuid::Uuid;

use crate::config::{JwtConfig, PasswordConfig};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserRole, VCard};
use crate::repositories::UserRepository;
use crate::utils::jwt::{
    generate_reset_token, generate_token_pair, validate_refresh_token, validate_reset_token,
};
use crate::utils::password::{hash_password, verify_password};

/// Account data before the password is hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub theme_id: Option<String>,
}

/// User service.
///
/// Since `UserRepository` uses `Arc` internally via the connection pool,
/// cloning is cheap.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    password: PasswordConfig,
}

impl UserService {
    pub fn new(repo: UserRepository, password: PasswordConfig) -> Self {
        Self { repo, password }
    }

    /// Hashes the password and inserts the account with an empty vCard.
    ///
    /// # Returns
    /// The created user; a taken e-mail is [`AppError::Duplicate`]
    pub async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        let password = hash_password(&input.password, &self.password)?;
        let user = self
            .repo
            .create(NewUser {
                name: input.name.trim().to_string(),
                email: normalize_email(&input.email),
                password,
                role: input.role,
                theme_id: input.theme_id,
                v_card: VCard::default(),
            })
            .await?;

        tracing::info!(user_uuid = %user.uuid, role = %user.role, "User created");
        Ok(user)
    }

    /// Gets a user by the uuid carried in token subjects.
    pub async fn get_by_uuid(&self, user_uuid: Uuid) -> AppResult<User> {
        self.repo
            .find_by_uuid(user_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                field: "uuid".to_string(),
                value: user_uuid.to_string(),
            })
    }

    /// Checks credentials and issues an access/refresh pair.
    ///
    /// # Returns
    /// A tuple of (user, access_token, refresh_token)
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        jwt: &JwtConfig,
    ) -> AppResult<(User, String, String)> {
        // Same message for unknown e-mail and wrong password
        let invalid = || AppError::Unauthorized {
            message: "Invalid email or password".to_string(),
        };

        let user = self
            .repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password)? {
            tracing::debug!(user_uuid = %user.uuid, "Password mismatch");
            return Err(invalid());
        }

        let (access_token, refresh_token) = generate_token_pair(&user, jwt)?;
        Ok((user, access_token, refresh_token))
    }

    /// Exchanges a refresh token for a new pair. The account must still exist.
    pub async fn refresh(&self, refresh_token: &str, jwt: &JwtConfig) -> AppResult<(String, String)> {
        let claims = validate_refresh_token(refresh_token, &jwt.secret)?;
        let user = self
            .repo
            .find_by_uuid(claims.user_uuid()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Account no longer exists".to_string(),
            })?;

        generate_token_pair(&user, jwt)
    }

    /// Issues a password reset token for the account with `email`.
    pub async fn issue_reset_token(&self, email: &str, jwt: &JwtConfig) -> AppResult<String> {
        let email = normalize_email(email);
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                field: "email".to_string(),
                value: email.clone(),
            })?;

        tracing::info!(user_uuid = %user.uuid, "Password reset token issued");
        generate_reset_token(&user, jwt)
    }

    /// Consumes a reset token and stores the new password hash.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
        jwt: &JwtConfig,
    ) -> AppResult<User> {
        let claims = validate_reset_token(reset_token, &jwt.secret)?;
        let user_uuid = claims.user_uuid()?;

        let update = UpdateUser {
            password: Some(hash_password(new_password, &self.password)?),
            ..Default::default()
        };
        let user = self
            .repo
            .update(user_uuid, update)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Account no longer exists".to_string(),
            })?;

        tracing::info!(user_uuid = %user.uuid, "Password reset");
        Ok(user)
    }
}

/// E-mail addresses are stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
