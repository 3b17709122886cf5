use std::io::Cursor;

use async_trait::async_trait;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Limits};

use crate::error::{AppError, AppResult};
use crate::models::LogoFormat;

/// Widest rendition produced. Keeps the resize buffer bounded and stays
/// under the WebP encoder's 16383 pixel limit.
pub const MAX_LOGO_WIDTH: u32 = 8192;

/// Largest source side the decoder accepts.
const MAX_SOURCE_DIMENSION: u32 = 16_384;

/// Turns an uploaded logo into the renditions stored on a theme.
#[async_trait]
pub trait ImageConverter: Send + Sync {
    /// Scales `image` to `height` pixels, keeping its aspect ratio, and
    /// returns PNG and WebP renditions as `data:` URIs.
    async fn convert(&self, image: Vec<u8>, height: u32) -> AppResult<LogoFormat>;
}

/// [`ImageConverter`] backed by the `image` crate. Decoding and encoding run
/// on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateConverter;

impl ImageCrateConverter {
    pub fn new() -> Self {
        Self
    }

    fn convert_blocking(image: &[u8], height: u32) -> AppResult<LogoFormat> {
        if height == 0 {
            return Err(AppError::Validation {
                field: "height".to_string(),
                reason: "Logo height must be at least 1".to_string(),
            });
        }

        let decoded = decode(image)?;

        let width = scaled_width(decoded.width(), decoded.height(), height);
        if width > MAX_LOGO_WIDTH {
            return Err(AppError::BadRequest {
                message: format!(
                    "Logo would be {} pixels wide at height {}; the limit is {}",
                    width, height, MAX_LOGO_WIDTH
                ),
            });
        }
        let resized = decoded.resize_exact(width, height, FilterType::Lanczos3);
        // The WebP encoder only takes 8-bit RGB(A)
        let rgba = DynamicImage::ImageRgba8(resized.to_rgba8());

        Ok(LogoFormat {
            png: encode_data_uri(&rgba, ImageFormat::Png, "image/png")?,
            webp: encode_data_uri(&rgba, ImageFormat::WebP, "image/webp")?,
        })
    }
}

#[async_trait]
impl ImageConverter for ImageCrateConverter {
    async fn convert(&self, image: Vec<u8>, height: u32) -> AppResult<LogoFormat> {
        tokio::task::spawn_blocking(move || Self::convert_blocking(&image, height))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Image conversion task failed: {}", e),
            })?
    }
}

/// Decodes with bounded dimensions so a small upload cannot claim a huge canvas.
fn decode(image: &[u8]) -> AppResult<DynamicImage> {
    fn unreadable(e: impl std::fmt::Display) -> AppError {
        AppError::BadRequest {
            message: format!("Unreadable image: {}", e),
        }
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SOURCE_DIMENSION);
    limits.max_image_height = Some(MAX_SOURCE_DIMENSION);

    let mut reader = ImageReader::new(Cursor::new(image))
        .with_guessed_format()
        .map_err(unreadable)?;
    reader.limits(limits);
    reader.decode().map_err(unreadable)
}

/// Width that keeps the source aspect ratio at `target_height`, never below 1.
fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return 1;
    }
    let scaled = (u64::from(width) * u64::from(target_height) + u64::from(height) / 2)
        / u64::from(height);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

fn encode_data_uri(image: &DynamicImage, format: ImageFormat, mime: &str) -> AppResult<String> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to encode {}: {}", mime, e),
        })?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(buffer.into_inner());
    Ok(format!("data:{};base64,{}", mime, encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([24, 45, 48, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn decode_data_uri(uri: &str, mime: &str) -> DynamicImage {
        let prefix = format!("data:{};base64,", mime);
        let payload = uri.strip_prefix(&prefix).expect("data uri prefix");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_scaled_width_keeps_aspect_ratio() {
        assert_eq!(scaled_width(200, 100, 30), 60);
        assert_eq!(scaled_width(100, 100, 30), 30);
        assert_eq!(scaled_width(1, 1000, 30), 1);
        assert_eq!(scaled_width(10, 0, 30), 1);
    }

    #[tokio::test]
    async fn test_convert_produces_png_and_webp_at_height() {
        let converter = ImageCrateConverter::new();
        let format = converter.convert(png_fixture(200, 100), 30).await.unwrap();

        let png = decode_data_uri(&format.png, "image/png");
        assert_eq!((png.width(), png.height()), (60, 30));

        let webp = decode_data_uri(&format.webp, "image/webp");
        assert_eq!((webp.width(), webp.height()), (60, 30));
    }

    #[tokio::test]
    async fn test_convert_rejects_garbage() {
        let converter = ImageCrateConverter::new();
        assert!(matches!(
            converter.convert(b"not an image".to_vec(), 30).await,
            Err(AppError::BadRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_convert_rejects_renditions_wider_than_limit() {
        let converter = ImageCrateConverter::new();
        match converter.convert(png_fixture(10_000, 1), 2048).await {
            Err(AppError::BadRequest { message }) => assert!(message.contains("8192")),
            other => panic!("Expected BadRequest, got {:?}", other),
        }

        let format = converter.convert(png_fixture(4096, 1), 2).await.unwrap();
        let png = decode_data_uri(&format.png, "image/png");
        assert_eq!((png.width(), png.height()), (MAX_LOGO_WIDTH, 2));
    }

    #[tokio::test]
    async fn test_convert_rejects_oversized_source() {
        let converter = ImageCrateConverter::new();
        assert!(matches!(
            converter
                .convert(png_fixture(MAX_SOURCE_DIMENSION + 1, 1), 1)
                .await,
            Err(AppError::BadRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_convert_rejects_zero_height() {
        let converter = ImageCrateConverter::new();
        assert!(matches!(
            converter.convert(png_fixture(4, 4), 0).await,
            Err(AppError::Validation { .. })
        ));
    }
}
