//! Color mapping: reduce samples to palette entries.
//!
//! # Architecture
//!
//! [`map_colors`] lifts a [`Bitmap`] into a floating-point
//! [`WorkingBuffer`] in the working color space chosen by the
//! [`ColorPipeline`], hands it to a [`Quantize`] strategy, and lowers the
//! result back to bytes. The color-space conversion brackets the whole
//! mapping stage: samples and palette are converted once on the way in and
//! once on the way out, never inside the search loop.
//!
//! Strategies:
//!
//! - [`Atkinson`]: nearest-color search with serpentine Atkinson error
//!   diffusion
//! - [`Threshold`]: luminance banding over the luminance-sorted palette
//!
//! [`Algorithm::None`] skips quantization and only performs the color-space
//! round trip.

mod atkinson;
mod kernel;
mod metric;
mod threshold;

pub use atkinson::Atkinson;
pub use kernel::{Kernel, ATKINSON};
pub use metric::DistanceMetric;
pub use threshold::Threshold;

use crate::bitmap::Bitmap;
use crate::color::{decode_gamma, encode_gamma, Rgb};
use crate::options::{Algorithm, ColorPipeline, ProcessingOptions};

/// Trait for palette reduction strategies.
///
/// Implementors rewrite every sample of the buffer to one of the given
/// palette values. Palette values are already in the buffer's working space.
pub trait Quantize {
    fn quantize(&self, buffer: &mut WorkingBuffer, palette: &[[f32; 3]]);
}

/// Numeric space samples live in while being mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingSpace {
    /// Gamma-encoded values in 0.0..=255.0.
    Encoded,
    /// `(v / 255)^2.2`, values in 0.0..=1.0.
    Linear,
}

impl WorkingSpace {
    pub fn for_pipeline(pipeline: ColorPipeline) -> Self {
        if pipeline.is_linear() {
            WorkingSpace::Linear
        } else {
            WorkingSpace::Encoded
        }
    }

    /// Full-scale value of a channel in this space.
    #[inline]
    pub fn range(self) -> f32 {
        match self {
            WorkingSpace::Encoded => 255.0,
            WorkingSpace::Linear => 1.0,
        }
    }

    #[inline]
    pub fn lift(self, value: u8) -> f32 {
        match self {
            WorkingSpace::Encoded => value as f32,
            WorkingSpace::Linear => decode_gamma(value),
        }
    }

    #[inline]
    pub fn lower(self, value: f32) -> u8 {
        let encoded = match self {
            WorkingSpace::Encoded => value,
            WorkingSpace::Linear => encode_gamma(value),
        };
        encoded.clamp(0.0, 255.0).round() as u8
    }

    pub fn lift_color(self, color: Rgb) -> [f32; 3] {
        [self.lift(color.r), self.lift(color.g), self.lift(color.b)]
    }
}

/// Floating-point RGB samples for one mapping pass.
///
/// Owned by a single [`map_colors`] call; accumulated diffusion error lives
/// here unclipped until the buffer is lowered back to bytes.
#[derive(Debug, Clone)]
pub struct WorkingBuffer {
    width: usize,
    height: usize,
    space: WorkingSpace,
    samples: Vec<[f32; 3]>,
}

impl WorkingBuffer {
    /// Lift a bitmap's RGB channels into `space`; alpha is discarded.
    pub fn from_bitmap(bitmap: &Bitmap, space: WorkingSpace) -> Self {
        let samples = bitmap
            .pixels()
            .map(|[r, g, b, _]| [space.lift(r), space.lift(g), space.lift(b)])
            .collect();
        Self {
            width: bitmap.width() as usize,
            height: bitmap.height() as usize,
            space,
            samples,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn space(&self) -> WorkingSpace {
        self.space
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        self.samples[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: [f32; 3]) {
        self.samples[y * self.width + x] = value;
    }

    /// Add `error * share` to the sample at `(x, y)`.
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, error: [f32; 3], share: f32) {
        let sample = &mut self.samples[y * self.width + x];
        for c in 0..3 {
            sample[c] += error[c] * share;
        }
    }

    pub fn samples_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.samples
    }

    /// Lower back to an opaque RGBA8 bitmap, clamping and rounding.
    pub fn into_bitmap(self) -> Bitmap {
        let space = self.space;
        let mut data = Vec::with_capacity(self.samples.len() * 4);
        for [r, g, b] in self.samples {
            data.extend_from_slice(&[space.lower(r), space.lower(g), space.lower(b), 255]);
        }
        Bitmap::new(self.width as u32, self.height as u32, data)
            .expect("working buffer mirrors a valid bitmap")
    }
}

/// Map every pixel of `bitmap` according to `options.algorithm`.
///
/// Output is always opaque. The caller's palette ordering is never changed.
pub fn map_colors(bitmap: &Bitmap, options: &ProcessingOptions) -> Bitmap {
    let space = WorkingSpace::for_pipeline(options.color_pipeline);
    let mut buffer = WorkingBuffer::from_bitmap(bitmap, space);

    let palette: Vec<[f32; 3]> = options
        .palette
        .colors()
        .iter()
        .map(|&c| space.lift_color(c))
        .collect();

    match options.algorithm {
        Algorithm::None => {}
        Algorithm::Atkinson => {
            Atkinson::new(DistanceMetric::for_pipeline(options.color_pipeline))
                .quantize(&mut buffer, &palette);
        }
        Algorithm::Threshold => {
            Threshold::new(options.threshold).quantize(&mut buffer, &palette);
        }
    }

    buffer.into_bitmap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use pretty_assertions::assert_eq;

    fn options(algorithm: Algorithm, pipeline: ColorPipeline) -> ProcessingOptions {
        ProcessingOptions {
            algorithm,
            threshold: 128,
            palette: Palette::from_hex(&["#000000", "#ff0000", "#ffffff"]).unwrap(),
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
            invert: false,
            point_size: 1,
            color_pipeline: pipeline,
        }
    }

    fn ramp() -> Bitmap {
        Bitmap::from_fn(16, 4, |x, y| {
            let v = (x * 16 + y * 3) as u8;
            [v, v / 2, 255 - v, 40]
        })
        .unwrap()
    }

    #[test]
    fn test_none_round_trips_in_every_space() {
        let src = ramp();
        for pipeline in [
            ColorPipeline::Standard,
            ColorPipeline::Smooth,
            ColorPipeline::Linear,
        ] {
            let out = map_colors(&src, &options(Algorithm::None, pipeline));
            for (a, b) in src.pixels().zip(out.pixels()) {
                assert_eq!(&a[..3], &b[..3], "pipeline {pipeline}");
                assert_eq!(b[3], 255);
            }
        }
    }

    #[test]
    fn test_quantizing_algorithms_stay_in_palette() {
        let src = ramp();
        for algorithm in [Algorithm::Atkinson, Algorithm::Threshold] {
            for pipeline in [
                ColorPipeline::Standard,
                ColorPipeline::Smooth,
                ColorPipeline::Linear,
            ] {
                let opts = options(algorithm, pipeline);
                let out = map_colors(&src, &opts);
                for px in out.pixels() {
                    assert!(
                        opts.palette.contains(Rgb::new(px[0], px[1], px[2])),
                        "{algorithm}/{pipeline} produced {px:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_lift_lower_inverse() {
        for space in [WorkingSpace::Encoded, WorkingSpace::Linear] {
            for v in 0..=255u8 {
                assert_eq!(space.lower(space.lift(v)), v);
            }
        }
    }

    #[test]
    fn test_lower_clamps_accumulated_error() {
        assert_eq!(WorkingSpace::Encoded.lower(-30.0), 0);
        assert_eq!(WorkingSpace::Encoded.lower(300.0), 255);
        assert_eq!(WorkingSpace::Linear.lower(-0.2), 0);
        assert_eq!(WorkingSpace::Linear.lower(1.3), 255);
    }
}
