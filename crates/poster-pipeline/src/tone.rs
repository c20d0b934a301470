//! Tone correction: invert, brightness, contrast, gamma.
//!
//! The curve depends only on the input byte, so it is evaluated once into a
//! 256-entry table and applied by lookup.

use crate::bitmap::Bitmap;
use crate::options::ProcessingOptions;

/// Per-channel tone curve.
///
/// Stages run in a fixed order on values normalized to 0..=1:
///
/// 1. invert: `v = 1 - v`
/// 2. brightness: `v += brightness / 100`
/// 3. contrast: `v = (v - 0.5) * c^2 + 0.5` with `c = (contrast + 100) / 100`
/// 4. gamma: `v = max(0, v)^(1 / gamma)` when `gamma != 1`
///
/// Inversion comes first so the brightness and contrast sliders keep their
/// direction when combined with invert. The result is clamped to 0..=255
/// and rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    pub invert: bool,
    pub brightness: f32,
    pub contrast: f32,
    pub gamma: f32,
}

impl ToneCurve {
    pub fn from_options(options: &ProcessingOptions) -> Self {
        Self {
            invert: options.invert,
            brightness: options.brightness,
            contrast: options.contrast,
            gamma: options.gamma,
        }
    }

    /// Whether the curve maps every byte to itself.
    pub fn is_identity(&self) -> bool {
        !self.invert && self.brightness == 0.0 && self.contrast == 0.0 && self.gamma == 1.0
    }

    /// Evaluate the curve for one 8-bit channel value.
    pub fn apply_channel(&self, value: u8) -> u8 {
        let mut v = value as f32 / 255.0;

        if self.invert {
            v = 1.0 - v;
        }

        v += self.brightness / 100.0;

        let c = (self.contrast + 100.0) / 100.0;
        v = (v - 0.5) * (c * c) + 0.5;

        if self.gamma != 1.0 {
            v = v.max(0.0).powf(1.0 / self.gamma);
        }

        (v * 255.0).clamp(0.0, 255.0).round() as u8
    }

    /// The curve tabulated for every byte value.
    pub fn table(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = self.apply_channel(i as u8);
        }
        table
    }

    /// Apply the curve to R, G and B of every pixel in place; alpha is untouched.
    pub fn apply(&self, bitmap: &mut Bitmap) {
        if self.is_identity() {
            return;
        }
        let table = self.table();
        for px in bitmap.pixels_mut() {
            px[0] = table[px[0] as usize];
            px[1] = table[px[1] as usize];
            px[2] = table[px[2] as usize];
        }
    }
}

/// Apply tone correction to `bitmap` in place.
pub fn apply_tone(bitmap: &mut Bitmap, invert: bool, brightness: f32, contrast: f32, gamma: f32) {
    ToneCurve {
        invert,
        brightness,
        contrast,
        gamma,
    }
    .apply(bitmap);
}
