//! Poster rendering: decode, run the pipeline and encode in one call.

use std::sync::Arc;
use std::time::Instant;

use poster_pipeline::ProcessingOptions;

use super::export::ExportFormat;
use super::source::BitmapSource;
use crate::error::ApiError;
use crate::models::{AppConfig, OptionsOverride};

/// Encoded pipeline output.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
}

/// Shared by the HTTP handlers and the CLI.
///
/// `render` is CPU bound; async callers run it on the blocking pool.
pub struct PosterService {
    config: Arc<AppConfig>,
    source: BitmapSource,
}

impl PosterService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let source = BitmapSource::new(config.max_target_length);
        Self { config, source }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Merge a partial request over the configured defaults.
    pub fn resolve_options(&self, overrides: &OptionsOverride) -> Result<ProcessingOptions, ApiError> {
        overrides.resolve(&self.config)
    }

    /// Decode `image`, process it and encode the result.
    ///
    /// Without an explicit `target_length` the source is shrunk to the
    /// configured target length but never enlarged.
    pub fn render(
        &self,
        image: &[u8],
        options: &ProcessingOptions,
        target_length: Option<u32>,
        format: ExportFormat,
    ) -> Result<Rendered, ApiError> {
        let start = Instant::now();

        let bitmap = match target_length {
            Some(target) => self.source.decode(image, Some(target))?,
            None => self.source.decode_bounded(image, self.config.target_length)?,
        };
        let decoded_ms = start.elapsed().as_millis();

        let output = poster_pipeline::process(&bitmap, options)?;
        let bytes = format.encode(&output)?;

        tracing::info!(
            width = output.width(),
            height = output.height(),
            algorithm = %options.algorithm,
            point_size = options.point_size,
            palette = options.palette.len(),
            input_bytes = image.len(),
            output_bytes = bytes.len(),
            decode_ms = decoded_ms as u64,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered poster"
        );

        Ok(Rendered {
            bytes,
            format,
            width: output.width(),
            height: output.height(),
        })
    }
}
