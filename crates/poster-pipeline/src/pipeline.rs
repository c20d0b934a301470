//! The four-stage transform: downsample, tone, map, upsample.

use crate::bitmap::Bitmap;
use crate::dither::map_colors;
use crate::error::ProcessError;
use crate::options::ProcessingOptions;
use crate::pixelate::{coarse_dimensions, downsample, upsample};
use crate::tone::ToneCurve;

/// Run the full pipeline on `bitmap`.
///
/// Stages run strictly in order:
///
/// 1. block-average into `point_size` points
/// 2. tone curve (invert, brightness, contrast, gamma)
/// 3. color mapping per `options.algorithm`
/// 4. nearest-neighbor expansion back to the source size
///
/// The output has the source's dimensions and is fully opaque. All
/// validation happens before any pixel is touched.
///
/// # Errors
///
/// - [`ProcessError::InvalidPalette`] for an empty palette
/// - [`ProcessError::InvalidParameter`] for out-of-range options, or when
///   the source is smaller than one point in either direction
///
/// # Example
///
/// ```
/// use poster_pipeline::{process, Algorithm, Bitmap, ColorPipeline, Palette, ProcessingOptions, Rgb};
///
/// let src = Bitmap::filled(8, 6, [200, 40, 40, 255]).unwrap();
/// let options = ProcessingOptions {
///     algorithm: Algorithm::Atkinson,
///     threshold: 128,
///     palette: Palette::new(vec![Rgb::BLACK, Rgb::new(255, 0, 0), Rgb::WHITE]).unwrap(),
///     brightness: 0.0,
///     contrast: 0.0,
///     gamma: 1.0,
///     invert: false,
///     point_size: 2,
///     color_pipeline: ColorPipeline::Standard,
/// };
///
/// let out = process(&src, &options).unwrap();
/// assert_eq!((out.width(), out.height()), (8, 6));
/// ```
pub fn process(bitmap: &Bitmap, options: &ProcessingOptions) -> Result<Bitmap, ProcessError> {
    options.validate()?;

    if coarse_dimensions(bitmap.width(), bitmap.height(), options.point_size).is_none() {
        return Err(ProcessError::parameter(
            "point_size",
            options.point_size,
            "exceeds the image width or height",
        ));
    }

    let mut coarse = downsample(bitmap, options.point_size);
    ToneCurve::from_options(options).apply(&mut coarse);
    let mapped = map_colors(&coarse, options);

    Ok(upsample(
        &mapped,
        bitmap.width(),
        bitmap.height(),
        options.point_size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::options::{Algorithm, ColorPipeline};
    use crate::palette::Palette;

    fn options(algorithm: Algorithm, point_size: u32) -> ProcessingOptions {
        ProcessingOptions {
            algorithm,
            threshold: 128,
            palette: Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap(),
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
            invert: false,
            point_size,
            color_pipeline: ColorPipeline::Standard,
        }
    }

    #[test]
    fn test_output_keeps_source_dimensions() {
        let src = Bitmap::filled(13, 7, [90, 90, 90, 255]).unwrap();
        for point_size in [1, 2, 3, 7] {
            let out = process(&src, &options(Algorithm::Atkinson, point_size)).unwrap();
            assert_eq!((out.width(), out.height()), (13, 7), "point size {point_size}");
        }
    }

    #[test]
    fn test_point_larger_than_image_rejected() {
        let src = Bitmap::filled(5, 20, [0, 0, 0, 255]).unwrap();
        let err = process(&src, &options(Algorithm::None, 6)).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidParameter {
                name: "point_size",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_options_rejected_before_work() {
        let src = Bitmap::filled(4, 4, [0, 0, 0, 255]).unwrap();
        let opts = ProcessingOptions {
            gamma: f32::NAN,
            ..options(Algorithm::Atkinson, 1)
        };
        assert!(matches!(
            process(&src, &opts),
            Err(ProcessError::InvalidParameter { name: "gamma", .. })
        ));
    }

    #[test]
    fn test_output_is_opaque() {
        let src = Bitmap::filled(6, 6, [30, 60, 90, 10]).unwrap();
        for algorithm in [Algorithm::None, Algorithm::Atkinson, Algorithm::Threshold] {
            let out = process(&src, &options(algorithm, 2)).unwrap();
            assert!(out.pixels().all(|p| p[3] == 255), "{algorithm}");
        }
    }

    #[test]
    fn test_tone_applies_to_points_before_mapping() {
        // White inverted is black, which is an exact palette match
        let src = Bitmap::filled(4, 4, [255, 255, 255, 255]).unwrap();
        let opts = ProcessingOptions {
            invert: true,
            ..options(Algorithm::Atkinson, 2)
        };
        let out = process(&src, &opts).unwrap();
        assert!(out.pixels().all(|p| p == [0, 0, 0, 255]));
    }
}
