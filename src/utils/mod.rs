//! Shared helpers: tokens, password hashing, request validation, search.

pub mod jwt;
pub mod password;
pub mod search;
pub mod validate;

pub use search::{contains_pattern, escape_like};
pub use validate::{ValidatedJson, ValidatedQuery};
