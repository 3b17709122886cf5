//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for themes and users.

mod theme_repo;
mod user_repo;

pub use theme_repo::ThemeRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub themes: ThemeRepository,
    pub users: UserRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            themes: ThemeRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }
}
