//! Database access plumbing.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8,
//! the embedded schema migrations and the SQL functions the repositories need.

pub mod functions;
mod migrations;
mod pool;

pub use migrations::{MIGRATIONS, pending_migrations, revert_migrations, run_pending_migrations};
pub use pool::{AsyncDbPool, establish_async_connection_pool};
