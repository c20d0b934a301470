use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::process::{image_response, parse_json, ProcessRequest, RenderJob};
use crate::error::ApiError;
use crate::services::{PosterService, PreviewRegistry};

/// Render a live preview
///
/// Requests sharing a session id are debounced. Only the most recent one
/// produces an image; older ones answer 204.
#[utoipa::path(
    post,
    path = "/api/preview/{session}",
    request_body = ProcessRequest,
    params(
        ("session" = String, Path, description = "Client-chosen preview session id"),
    ),
    responses(
        (status = 200, description = "Preview image", content_type = "image/png"),
        (status = 204, description = "Superseded by a newer request"),
        (status = 400, description = "Malformed request or undecodable image"),
        (status = 422, description = "Option out of range"),
    ),
    tag = "Processing"
)]
pub async fn handle_preview(
    State(service): State<Arc<PosterService>>,
    State(previews): State<Arc<PreviewRegistry>>,
    Path(session_id): Path<String>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = parse_json(payload)?;
    let job = RenderJob::prepare(&service, request)?.png();

    let session = previews.session(&session_id);
    match session.submit(move || job.run(&service)).await? {
        Some(rendered) => image_response(rendered?),
        None => {
            tracing::debug!(session = %session_id, "Preview dropped");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}
