//! Partial processing options sent by clients.

use poster_pipeline::{Algorithm, ColorPipeline, ProcessingOptions};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::config::AppConfig;
use crate::error::ApiError;
use crate::services::palette_deriver;

/// Palette reference: a preset name or an explicit color list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PaletteChoice {
    /// Name of a configured or built-in preset
    Preset(String),
    /// 2 to 8 hex strings or color names
    Colors(Vec<String>),
}

/// Processing options where every field is optional.
///
/// Unset fields are filled from the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct OptionsOverride {
    /// `none`, `atkinson` or `threshold`
    #[schema(value_type = Option<String>, example = "atkinson")]
    pub algorithm: Option<Algorithm>,
    /// Threshold bias, neutral at 128
    pub threshold: Option<u8>,
    pub palette: Option<PaletteChoice>,
    /// Use picked colors as-is instead of a gradient
    pub strict_swatches: Option<bool>,
    /// Gradient length; setting it turns strict swatches off unless
    /// `strict_swatches` is given
    pub gradient_steps: Option<usize>,
    /// -100..=100
    pub brightness: Option<f32>,
    /// -100..=100
    pub contrast: Option<f32>,
    /// 0.1..=3.0
    pub gamma: Option<f32>,
    pub invert: Option<bool>,
    /// Block size in pixels, at least 1
    pub point_size: Option<u32>,
    /// `default`, `smooth` or `linear`
    #[schema(value_type = Option<String>, example = "default")]
    pub color_pipeline: Option<ColorPipeline>,
}

impl OptionsOverride {
    /// Merge over `config.defaults` into a fully specified option set.
    ///
    /// Range checks are left to the pipeline; only palette resolution can
    /// fail here.
    pub fn resolve(&self, config: &AppConfig) -> Result<ProcessingOptions, ApiError> {
        let defaults = &config.defaults;

        let choice = self
            .palette
            .clone()
            .unwrap_or_else(|| PaletteChoice::Preset(defaults.palette.clone()));
        let names = match choice {
            PaletteChoice::Preset(name) => config
                .preset(&name)
                .ok_or(ApiError::UnknownPreset(name))?,
            PaletteChoice::Colors(colors) => colors,
        };
        let colors = names
            .iter()
            .map(|s| palette_deriver::parse_color(s))
            .collect::<Result<Vec<_>, _>>()?;
        let palette = palette_deriver::derive(
            &colors,
            self.strict_swatches
                .unwrap_or(self.gradient_steps.is_none() && defaults.strict_swatches),
            self.gradient_steps.unwrap_or(config.gradient_steps),
        )?;

        Ok(ProcessingOptions {
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            palette,
            brightness: self.brightness.unwrap_or(defaults.brightness),
            contrast: self.contrast.unwrap_or(defaults.contrast),
            gamma: self.gamma.unwrap_or(defaults.gamma),
            invert: self.invert.unwrap_or(defaults.invert),
            point_size: self.point_size.unwrap_or(defaults.point_size),
            color_pipeline: self.color_pipeline.unwrap_or(defaults.color_pipeline),
        })
    }
}
