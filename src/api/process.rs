use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use poster_pipeline::ProcessingOptions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::OptionsOverride;
use crate::services::{source, ExportFormat, PosterService, Rendered};

/// Output encoding requested by a client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

/// Request body for processing an image
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Source image as base64, optionally wrapped in a `data:` URL
    pub image: String,
    /// Options merged over the server defaults
    #[serde(default)]
    pub options: OptionsOverride,
    /// Longer edge of the working image; defaults to the configured length
    #[serde(default)]
    pub target_length: Option<u32>,
    #[serde(default)]
    pub format: OutputFormat,
    /// JPEG quality 1-100
    #[serde(default)]
    pub quality: Option<u8>,
}

/// A decoded request ready to run on the blocking pool.
pub(crate) struct RenderJob {
    image: Vec<u8>,
    options: ProcessingOptions,
    target_length: Option<u32>,
    format: ExportFormat,
}

impl RenderJob {
    pub(crate) fn prepare(service: &PosterService, request: ProcessRequest) -> Result<Self, ApiError> {
        let options = service.resolve_options(&request.options)?;
        let format = match request.format {
            OutputFormat::Png => ExportFormat::Png,
            OutputFormat::Jpeg => {
                ExportFormat::jpeg(request.quality.unwrap_or(service.config().jpeg_quality))?
            }
        };
        let image = source::decode_base64(&request.image)?;

        Ok(Self {
            image,
            options,
            target_length: request.target_length,
            format,
        })
    }

    /// Force PNG output regardless of the requested format.
    pub(crate) fn png(mut self) -> Self {
        self.format = ExportFormat::Png;
        self
    }

    pub(crate) fn run(self, service: &PosterService) -> Result<Rendered, ApiError> {
        service.render(&self.image, &self.options, self.target_length, self.format)
    }
}

pub(crate) fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::InvalidRequest(e.body_text())
        }
    })
}

pub(crate) fn image_response(rendered: Rendered) -> Result<Response, ApiError> {
    Response::builder()
        .header(header::CONTENT_TYPE, rendered.format.content_type())
        .header("X-Poster-Width", rendered.width)
        .header("X-Poster-Height", rendered.height)
        .body(Body::from(rendered.bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Process an image into a poster
///
/// Decodes the image, runs pixelation, tone correction and color mapping,
/// and returns the encoded result.
#[utoipa::path(
    post,
    path = "/api/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Processed image", content_type = "image/png"),
        (status = 400, description = "Malformed request or undecodable image"),
        (status = 404, description = "Unknown palette preset"),
        (status = 422, description = "Option out of range"),
    ),
    tag = "Processing"
)]
pub async fn handle_process(
    State(service): State<Arc<PosterService>>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = parse_json(payload)?;
    let job = RenderJob::prepare(&service, request)?;

    let rendered = tokio::task::spawn_blocking(move || job.run(&service)).await??;
    image_response(rendered)
}
