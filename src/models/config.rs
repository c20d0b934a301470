use poster_pipeline::{Algorithm, ColorPipeline};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the HTTP server binds to (overridden by `BIND_ADDR`)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Longer edge of decoded sources, in pixels
    #[serde(default = "default_target_length")]
    pub target_length: u32,

    /// Upper bound for a per-request target length
    #[serde(default = "default_max_target_length")]
    pub max_target_length: u32,

    /// Gradient length when strict swatches are off
    #[serde(default = "default_gradient_steps")]
    pub gradient_steps: usize,

    /// JPEG quality when a request does not specify one
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Quiet period before a preview request is dispatched
    #[serde(default = "default_preview_debounce_ms")]
    pub preview_debounce_ms: u64,

    /// Maximum accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Processing options applied where a request leaves a field unset
    #[serde(default)]
    pub defaults: DefaultOptions,

    /// Named palettes; entries here shadow the built-in presets
    #[serde(default)]
    pub palettes: BTreeMap<String, Vec<String>>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_target_length() -> u32 {
    1200
}

fn default_max_target_length() -> u32 {
    4000
}

fn default_gradient_steps() -> usize {
    8
}

fn default_jpeg_quality() -> u8 {
    90
}

fn default_preview_debounce_ms() -> u64 {
    150
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

/// Full default option set.
///
/// Unlike the pipeline's own options, the palette is referenced by preset
/// name and resolved when a request is merged.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultOptions {
    pub algorithm: Algorithm,
    pub threshold: u8,
    pub brightness: f32,
    pub contrast: f32,
    pub gamma: f32,
    pub invert: bool,
    pub point_size: u32,
    pub color_pipeline: ColorPipeline,
    pub palette: String,
    pub strict_swatches: bool,
}

impl Default for DefaultOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Atkinson,
            threshold: 128,
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
            invert: false,
            point_size: 1,
            color_pipeline: ColorPipeline::Standard,
            palette: "mono".to_string(),
            strict_swatches: true,
        }
    }
}

/// Presets available without any configuration.
pub const BUILTIN_PALETTES: &[(&str, &[&str])] = &[
    ("mono", &["#000000", "#ffffff"]),
    ("duotone", &["#1d3557", "#f1faee"]),
    (
        "risograph",
        &["#1a1a1a", "#0078bf", "#ff48b0", "#ffe800", "#f7f3e8"],
    ),
];

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing path, unreadable file or malformed YAML falls back to the
    /// defaults with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No config file given, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    let config = config.sanitized();
                    tracing::info!(
                        path = %path.display(),
                        palettes = config.presets().len(),
                        target_length = config.target_length,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Pull the size limits back into a usable range.
    ///
    /// A default target outside `1..=max_target_length` would make every
    /// request without an explicit target fail.
    fn sanitized(mut self) -> Self {
        if self.max_target_length == 0 {
            tracing::warn!(
                "max_target_length must be at least 1, using {}",
                default_max_target_length()
            );
            self.max_target_length = default_max_target_length();
        }
        if self.target_length == 0 || self.target_length > self.max_target_length {
            let clamped = self.target_length.clamp(1, self.max_target_length);
            tracing::warn!(
                target_length = self.target_length,
                max_target_length = self.max_target_length,
                "target_length out of range, using {clamped}"
            );
            self.target_length = clamped;
        }
        self
    }

    /// Colors of a named preset, configured presets first.
    pub fn preset(&self, name: &str) -> Option<Vec<String>> {
        if let Some(colors) = self.palettes.get(name) {
            return Some(colors.clone());
        }
        BUILTIN_PALETTES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, colors)| colors.iter().map(|c| c.to_string()).collect())
    }

    /// Every preset by name, built-ins merged under configured ones.
    pub fn presets(&self) -> BTreeMap<String, Vec<String>> {
        let mut all: BTreeMap<String, Vec<String>> = BUILTIN_PALETTES
            .iter()
            .map(|(name, colors)| {
                (
                    name.to_string(),
                    colors.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();
        all.extend(self.palettes.clone());
        all
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            target_length: default_target_length(),
            max_target_length: default_max_target_length(),
            gradient_steps: default_gradient_steps(),
            jpeg_quality: default_jpeg_quality(),
            preview_debounce_ms: default_preview_debounce_ms(),
            max_body_bytes: default_max_body_bytes(),
            defaults: DefaultOptions::default(),
            palettes: BTreeMap::new(),
        }
    }
}
