//! Collaborators outside the request/database path.

mod image_converter;

pub use image_converter::{ImageConverter, ImageCrateConverter, MAX_LOGO_WIDTH};
