//! Luminance banding.

use super::{Quantize, WorkingBuffer};
use crate::color::luminance;

/// Map each sample to a luminance band of the palette.
///
/// The palette is sorted by Rec.709 luminance measured in the working space
/// (a stable sort on a private copy), so the band order can differ between
/// the encoded and linear pipelines, and the working range is split into `n` equal bands. A sample's
/// luminance, shifted by the bias, picks the band:
///
/// ```text
/// bias  = (threshold - 128) / 128 * range / 2
/// index = min(floor(clamp(L - bias, 0, range) / range * n), n - 1)
/// ```
///
/// Raising the threshold pushes samples towards darker entries. No error is
/// diffused, so uniform regions stay uniform.
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    threshold: u8,
}

impl Threshold {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Quantize for Threshold {
    fn quantize(&self, buffer: &mut WorkingBuffer, palette: &[[f32; 3]]) {
        let mut sorted = palette.to_vec();
        sorted.sort_by(|a, b| luminance(*a).total_cmp(&luminance(*b)));

        let n = sorted.len();
        let range = buffer.space().range();
        let bias = (self.threshold as f32 - 128.0) / 128.0 * range / 2.0;

        for sample in buffer.samples_mut() {
            let biased = (luminance(*sample) - bias).clamp(0.0, range);
            let index = ((biased / range * n as f32).floor() as usize).min(n - 1);
            *sample = sorted[index];
        }
    }
}
