//! Bitmap source: decode uploaded images and scale them to the working size.

use base64::Engine;
use image::imageops::FilterType;
use image::DynamicImage;
use poster_pipeline::Bitmap;

use crate::error::SourceError;

/// Decodes PNG, JPEG, GIF, BMP and WebP into pipeline bitmaps.
#[derive(Debug, Clone, Copy)]
pub struct BitmapSource {
    max_target_length: u32,
}

impl BitmapSource {
    pub fn new(max_target_length: u32) -> Self {
        Self { max_target_length }
    }

    /// Decode `bytes` and scale so the longer edge equals `target_length`.
    ///
    /// `None` keeps the native size. Aspect ratio is preserved and neither
    /// side drops below one pixel.
    pub fn decode(&self, bytes: &[u8], target_length: Option<u32>) -> Result<Bitmap, SourceError> {
        if let Some(value) = target_length {
            self.check_target(value)?;
        }
        let image = load(bytes)?;
        let image = match target_length {
            Some(target) => resize(image, target),
            None => image,
        };
        into_bitmap(image)
    }

    /// Decode `bytes`, shrinking only when the longer edge exceeds `limit`.
    pub fn decode_bounded(&self, bytes: &[u8], limit: u32) -> Result<Bitmap, SourceError> {
        self.check_target(limit)?;
        let image = load(bytes)?;
        let image = if image.width().max(image.height()) > limit {
            resize(image, limit)
        } else {
            image
        };
        into_bitmap(image)
    }

    fn check_target(&self, value: u32) -> Result<(), SourceError> {
        if value == 0 || value > self.max_target_length {
            return Err(SourceError::TargetLength {
                value,
                max: self.max_target_length,
            });
        }
        Ok(())
    }
}

fn load(bytes: &[u8]) -> Result<DynamicImage, SourceError> {
    image::load_from_memory(bytes).map_err(|e| SourceError::Decode(e.to_string()))
}

fn resize(image: DynamicImage, target: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let (w, h) = scaled_dimensions(width, height, target);
    if (w, h) == (width, height) {
        return image;
    }
    tracing::debug!(from_w = width, from_h = height, to_w = w, to_h = h, "Scaling source");
    image.resize_exact(w, h, FilterType::Triangle)
}

fn into_bitmap(image: DynamicImage) -> Result<Bitmap, SourceError> {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    Bitmap::new(w, h, rgba.into_raw()).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Dimensions with the longer edge set to `target`, aspect preserved.
pub fn scaled_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        ((short as u64 * target as u64 + long as u64 / 2) / long as u64).max(1) as u32
    };
    if width >= height {
        (target, scale(height, width))
    } else {
        (scale(width, height), target)
    }
}

/// Decode a base64 payload, with or without a `data:` URL prefix.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, SourceError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| SourceError::Base64(e.to_string()))
}
