#![allow(clippy::excessive_precision, clippy::module_inception)]

//! poster-pipeline: flat, limited-palette poster rendering
//!
//! This library turns an RGBA bitmap into a pixelated, palette-reduced
//! bitmap of the same size, suitable for screen-print style posters.
//!
//! # Quick Start
//!
//! [`process`] is the only entry point. It takes a fully specified
//! [`ProcessingOptions`]; there are no implicit defaults.
//!
//! ```
//! use poster_pipeline::{process, Algorithm, Bitmap, ColorPipeline, Palette, ProcessingOptions};
//!
//! let src = Bitmap::filled(4, 4, [128, 128, 128, 255]).unwrap();
//! let options = ProcessingOptions {
//!     algorithm: Algorithm::Threshold,
//!     threshold: 128,
//!     palette: Palette::from_hex(&["#000000", "#ffffff"]).unwrap(),
//!     brightness: 0.0,
//!     contrast: 0.0,
//!     gamma: 1.0,
//!     invert: false,
//!     point_size: 1,
//!     color_pipeline: ColorPipeline::Standard,
//! };
//!
//! let out = process(&src, &options).unwrap();
//! let first = out.pixel(0, 0);
//! assert!(out.pixels().all(|p| p == first));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA8 source
//!     |
//!     v
//! [downsample]      point_size x point_size block means, floor dimensions
//!     |
//!     v
//! [tone curve]      invert -> brightness -> contrast -> gamma, via 256-entry table
//!     |
//!     v
//! [lift]            encoded 0..=255 or linear (v/255)^2.2, per color pipeline
//!     |
//!     v
//! [map colors]      none | threshold bands | serpentine Atkinson
//!     |
//!     v
//! [lower]           encode, clamp, round; alpha forced to 255
//!     |
//!     v
//! [upsample]        nearest neighbor back to the source size
//! ```
//!
//! # Color Pipelines
//!
//! | Pipeline | Working space | Nearest-color weights |
//! |----------|---------------|-----------------------|
//! | `default` | encoded | Rec.601 (0.299, 0.587, 0.114) |
//! | `smooth` | encoded | Rec.709 (0.2126, 0.7152, 0.0722) |
//! | `linear` | gamma 2.2 linear | unweighted |
//!
//! Threshold banding always sorts and measures by Rec.709 luminance in the
//! working space.
//!
//! # Atkinson Error Diffusion
//!
//! The scan is serpentine and only 6/8 of the quantization error is passed
//! on. Dropping a quarter of the error keeps flat poster regions flat on
//! two- and three-color palettes instead of filling them with worms.
//!
//! # Errors
//!
//! Every failure is an input-validation failure reported as
//! [`ProcessError`] before any pixel is touched. Internal invariant
//! violations panic.

pub mod bitmap;
pub mod color;
pub mod dither;
pub mod error;
pub mod options;
pub mod palette;
pub mod pixelate;
pub mod pipeline;
pub mod tone;


pub use bitmap::Bitmap;
pub use color::Rgb;
pub use dither::map_colors;
pub use error::ProcessError;
pub use options::{Algorithm, ColorPipeline, ProcessingOptions};
pub use palette::{Palette, PaletteError, ParseColorError};
pub use pipeline::process;
pub use pixelate::{downsample, upsample};
pub use tone::{apply_tone, ToneCurve};
