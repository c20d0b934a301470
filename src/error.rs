use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use poster_pipeline::{PaletteError, ProcessError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unknown palette preset: {0}")]
    UnknownPreset(String),

    #[error("Palette error: {0}")]
    Palette(#[from] DeriveError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("processing task failed: {e}"))
    }
}

/// Failure turning uploaded bytes into a bitmap.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid base64 payload: {0}")]
    Base64(String),

    #[error("Unsupported or corrupt image: {0}")]
    Decode(String),

    #[error("Target length {value} out of range (1..={max})")]
    TargetLength { value: u32, max: u32 },
}

/// Failure encoding the processed bitmap.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("JPEG encode error: {0}")]
    JpegEncode(String),

    #[error("JPEG quality {0} out of range (1..=100)")]
    Quality(u8),

    #[error("Unsupported output extension: {0}")]
    UnknownExtension(String),
}

/// Failure building a palette from user-picked colors.
#[derive(Debug, Error, PartialEq)]
pub enum DeriveError {
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Expected {min}..={max} colors, got {count}")]
    ColorCount { count: usize, min: usize, max: usize },

    #[error("Gradient steps {steps} out of range (2..={max})")]
    Steps { steps: usize, max: usize },

    #[error(transparent)]
    Palette(#[from] PaletteError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnknownPreset(_) => StatusCode::NOT_FOUND,
            ApiError::Palette(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Process(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Source(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(ExportError::Quality(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
