//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod seed_service;
mod theme_service;
mod user_service;

pub use seed_service::{
    AdminAccount, DEFAULT_THEME_ID, DEFAULT_THEME_NAME, SeedReport, Seeder,
};
pub use theme_service::{MAX_LOGO_HEIGHT, PageInfo, ThemePage, ThemeService, parse_logo_height};
pub use user_service::{CreateUser, UserService, normalize_email};

use std::sync::Arc;

use crate::config::PasswordConfig;
use crate::external::ImageConverter;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub themes: ThemeService,
    pub users: UserService,
}

impl Services {
    pub fn new(
        repos: Repositories,
        converter: Arc<dyn ImageConverter>,
        password: PasswordConfig,
    ) -> Self {
        Self {
            themes: ThemeService::new(repos.themes, converter),
            users: UserService::new(repos.users, password),
        }
    }
}
