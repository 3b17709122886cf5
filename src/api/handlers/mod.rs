//! HTTP request handlers for API endpoints, organized by resource.

pub mod auth;
pub mod health;
pub mod me;
pub mod themes;
