//! Processing options.
//!
//! [`ProcessingOptions`] is deliberately free of defaults: callers own the
//! defaulting policy and must hand the pipeline every field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;
use crate::palette::Palette;

/// Color reduction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// No quantization; previews tone corrections only.
    None,
    /// Nearest-color search with serpentine Atkinson error diffusion.
    Atkinson,
    /// Luminance-banded mapping onto the luminance-sorted palette.
    Threshold,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Atkinson => "atkinson",
            Algorithm::Threshold => "threshold",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working color space and distance metric for color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPipeline {
    /// Gamma-encoded space, Rec.601-weighted distance.
    #[serde(rename = "default")]
    Standard,
    /// Gamma-encoded space, Rec.709-weighted distance.
    Smooth,
    /// Gamma-linear space (2.2), unweighted distance.
    Linear,
}

impl ColorPipeline {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorPipeline::Standard => "default",
            ColorPipeline::Smooth => "smooth",
            ColorPipeline::Linear => "linear",
        }
    }

    /// Whether samples are mapped in gamma-linear space.
    #[inline]
    pub fn is_linear(self) -> bool {
        matches!(self, ColorPipeline::Linear)
    }
}

impl fmt::Display for ColorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<f32> = -100.0..=100.0;
pub const CONTRAST_RANGE: std::ops::RangeInclusive<f32> = -100.0..=100.0;
pub const GAMMA_RANGE: std::ops::RangeInclusive<f32> = 0.1..=3.0;

/// Full parameter set for one [`process`](crate::process) call.
///
/// # Example
///
/// ```
/// use poster_pipeline::{Algorithm, ColorPipeline, Palette, ProcessingOptions, Rgb};
///
/// let options = ProcessingOptions {
///     algorithm: Algorithm::Atkinson,
///     threshold: 128,
///     palette: Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap(),
///     brightness: 0.0,
///     contrast: 0.0,
///     gamma: 1.0,
///     invert: false,
///     point_size: 1,
///     color_pipeline: ColorPipeline::Standard,
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    pub algorithm: Algorithm,
    /// Threshold bias, neutral at 128. Only used by [`Algorithm::Threshold`].
    pub threshold: u8,
    pub palette: Palette,
    /// -100..=100, added as `brightness / 100` to normalized channels.
    pub brightness: f32,
    /// -100..=100, mapped to a slope of `((contrast + 100) / 100)^2`.
    pub contrast: f32,
    /// 0.1..=3.0; channels are raised to `1 / gamma`.
    pub gamma: f32,
    pub invert: bool,
    /// Side of the square averaged into one point; 1 disables pixelation.
    pub point_size: u32,
    pub color_pipeline: ColorPipeline,
}

impl ProcessingOptions {
    /// Check every numeric field against its accepted range.
    ///
    /// # Errors
    ///
    /// [`ProcessError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.palette.is_empty() {
            return Err(crate::palette::PaletteError::EmptyPalette.into());
        }
        if !self.gamma.is_finite() || !GAMMA_RANGE.contains(&self.gamma) {
            return Err(ProcessError::parameter(
                "gamma",
                self.gamma,
                "must be finite and within 0.1..=3.0",
            ));
        }
        if self.point_size < 1 {
            return Err(ProcessError::parameter(
                "point_size",
                self.point_size,
                "must be at least 1",
            ));
        }
        if !self.brightness.is_finite() || !BRIGHTNESS_RANGE.contains(&self.brightness) {
            return Err(ProcessError::parameter(
                "brightness",
                self.brightness,
                "must be within -100..=100",
            ));
        }
        if !self.contrast.is_finite() || !CONTRAST_RANGE.contains(&self.contrast) {
            return Err(ProcessError::parameter(
                "contrast",
                self.contrast,
                "must be within -100..=100",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn options() -> ProcessingOptions {
        ProcessingOptions {
            algorithm: Algorithm::Atkinson,
            threshold: 128,
            palette: Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap(),
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
            invert: false,
            point_size: 1,
            color_pipeline: ColorPipeline::Standard,
        }
    }

    #[test]
    fn test_neutral_options_valid() {
        assert_eq!(options().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_gamma() {
        for gamma in [0.0, -1.0, 0.05, 3.5, f32::NAN, f32::INFINITY] {
            let opts = ProcessingOptions {
                gamma,
                ..options()
            };
            assert!(
                matches!(
                    opts.validate(),
                    Err(ProcessError::InvalidParameter { name: "gamma", .. })
                ),
                "gamma {gamma} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_point_size() {
        let opts = ProcessingOptions {
            point_size: 0,
            ..options()
        };
        assert!(matches!(
            opts.validate(),
            Err(ProcessError::InvalidParameter {
                name: "point_size",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_sliders() {
        let opts = ProcessingOptions {
            brightness: 100.5,
            ..options()
        };
        assert!(opts.validate().is_err());

        let opts = ProcessingOptions {
            contrast: -101.0,
            ..options()
        };
        assert!(opts.validate().is_err());

        let opts = ProcessingOptions {
            brightness: -100.0,
            contrast: 100.0,
            gamma: 3.0,
            ..options()
        };
        assert!(opts.validate().is_ok(), "range endpoints are inclusive");
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(options()).unwrap();
        assert_eq!(json["algorithm"], "atkinson");
        assert_eq!(json["color_pipeline"], "default");

        let parsed: ColorPipeline = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(parsed, ColorPipeline::Linear);
        let parsed: Algorithm = serde_json::from_str("\"threshold\"").unwrap();
        assert_eq!(parsed, Algorithm::Threshold);
        assert!(serde_json::from_str::<Algorithm>("\"floyd\"").is_err());
    }

    #[test]
    fn test_threshold_out_of_range_rejected_at_parse() {
        let mut json = serde_json::to_value(options()).unwrap();
        json["threshold"] = serde_json::json!(300);
        assert!(serde_json::from_value::<ProcessingOptions>(json).is_err());
    }
}
