//! Database bootstrap: wipe both tables, then insert the default theme and
//! the first admin account.

use crate::config::PasswordConfig;
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewTheme, Theme, User, UserRole};
use crate::repositories::{ThemeRepository, UserRepository};
use crate::services::user_service::{CreateUser, UserService};

/// `themeId` of the theme every fresh install starts with.
pub const DEFAULT_THEME_ID: &str = "1";
pub const DEFAULT_THEME_NAME: &str = "Default";

/// Credentials of the admin account created by a seed run.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// What a seed run left in the database.
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub deleted_themes: usize,
    pub deleted_users: usize,
    pub theme: Theme,
    pub admin: User,
}

pub struct Seeder {
    themes: ThemeRepository,
    users: UserRepository,
    accounts: UserService,
}

impl Seeder {
    pub fn new(pool: AsyncDbPool, password: PasswordConfig) -> Self {
        let users = UserRepository::new(pool.clone());
        Self {
            themes: ThemeRepository::new(pool),
            accounts: UserService::new(users.clone(), password),
            users,
        }
    }

    /// Deletes every theme and user. The two deletes run concurrently.
    pub async fn wipe(&self) -> AppResult<(usize, usize)> {
        let (deleted_themes, deleted_users) =
            tokio::try_join!(self.themes.delete_all(), self.users.delete_all())?;
        tracing::info!(deleted_themes, deleted_users, "Wiped themes and users");
        Ok((deleted_themes, deleted_users))
    }

    pub async fn install_theme(&self) -> AppResult<Theme> {
        let theme = self
            .themes
            .create(NewTheme::with_theme_id(DEFAULT_THEME_ID, DEFAULT_THEME_NAME)?)
            .await?;
        tracing::info!(theme_id = %theme.theme_id, "Default theme installed");
        Ok(theme)
    }

    pub async fn install_admin(&self, admin: AdminAccount, theme: &Theme) -> AppResult<User> {
        self.accounts
            .create_user(CreateUser {
                name: admin.name,
                email: admin.email,
                password: admin.password,
                role: UserRole::Admin,
                theme_id: Some(theme.theme_id.clone()),
            })
            .await
    }

    /// Runs the whole bootstrap. Nothing is rolled back if a later step fails.
    pub async fn run(&self, admin: AdminAccount) -> AppResult<SeedReport> {
        let (deleted_themes, deleted_users) = self.wipe().await?;
        let theme = self.install_theme().await?;
        let admin = self.install_admin(admin, &theme).await?;

        Ok(SeedReport {
            deleted_themes,
            deleted_users,
            theme,
            admin,
        })
    }
}
