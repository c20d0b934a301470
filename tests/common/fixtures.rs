//! Test fixtures: small source images and request bodies.

use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};
use std::io::Cursor;

pub const BLACK: [u8; 3] = [0, 0, 0];
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Horizontal grey ramp from black to white
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        Rgba([v, v, v, 255])
    })
}

/// Deterministic noise that PNG cannot compress much
pub fn noise(width: u32, height: u32) -> RgbaImage {
    let mut state: u32 = 0x2545_f491;
    RgbaImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgba([next(), next(), next(), 255])
    })
}

/// Single-color image
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

/// Encode an image in the given format
pub fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .write_to(&mut buf, format)
            .expect("Failed to encode fixture"),
        _ => image
            .write_to(&mut buf, format)
            .expect("Failed to encode fixture"),
    }
    buf.into_inner()
}

/// PNG bytes as base64
pub fn png_base64(image: &RgbaImage) -> String {
    base64::engine::general_purpose::STANDARD.encode(encode(image, ImageFormat::Png))
}

/// Process request body with the given options object
pub fn process_body(image: &RgbaImage, options: Value) -> Value {
    json!({
        "image": png_base64(image),
        "options": options,
    })
}
