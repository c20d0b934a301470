//! Color types and conversion utilities
//!
//! Two working representations are used by the pipeline:
//!
//! - **Encoded**: gamma-encoded 8-bit values, handled as floats in 0..=255.
//! - **Linear**: `(v / 255)^2.2`, floats in 0..=1, proportional to light.
//!
//! # Example
//!
//! ```
//! use poster_pipeline::color::{decode_gamma, encode_gamma, luminance};
//!
//! let linear = decode_gamma(128);
//! assert_eq!(encode_gamma(linear).round() as u8, 128);
//!
//! // Rec.709 luminance of pure green
//! assert!((luminance([0.0, 1.0, 0.0]) - 0.7152).abs() < 1e-6);
//! ```

mod lut;
mod rgb;

pub use lut::{decode_gamma, encode_gamma};
pub use rgb::Rgb;

/// Rec.709 luma weights (R, G, B).
pub const REC709_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Rec.601 luma weights (R, G, B).
pub const REC601_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Rec.709 relative luminance of a sample, in the sample's own units.
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    REC709_WEIGHTS[0] * rgb[0] + REC709_WEIGHTS[1] * rgb[1] + REC709_WEIGHTS[2] * rgb[2]
}
