//! Command handlers for CLI operations
//!
//! One handler per subcommand; parsing and validation live elsewhere.

pub mod migrate;
pub mod seed;
pub mod serve;

pub use migrate::MigrateCommandHandler;
pub use seed::{SeedArgs, SeedCommandHandler};
pub use serve::ServeCommandHandler;
