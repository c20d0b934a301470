//! Unified error type for the pipeline.
//!
//! Every variant is an input-validation failure detected before any pixel
//! is touched. There are no retryable failures: the pipeline does no I/O.

use thiserror::Error;

use crate::palette::PaletteError;

/// Error returned by [`process`](crate::process) and the [`Bitmap`](crate::Bitmap)
/// constructors.
///
/// # Example
///
/// ```
/// use poster_pipeline::{Bitmap, ProcessError};
///
/// let err = Bitmap::new(2, 2, vec![0; 3]).unwrap_err();
/// assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// Zero width/height, or a buffer whose length is not `width * height * 4`.
    #[error("invalid dimensions: {width}x{height} with {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    /// Empty palette or unparseable palette entry.
    #[error("invalid palette: {0}")]
    InvalidPalette(#[from] PaletteError),

    /// A processing option outside its accepted range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ProcessError {
    pub(crate) fn parameter(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        ProcessError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
