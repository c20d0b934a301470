use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use super::process::parse_json;
use crate::error::ApiError;
use crate::services::{palette_deriver, PosterService};

/// Request body for palette derivation
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaletteRequest {
    /// 2 to 8 hex strings or color names
    pub colors: Vec<String>,
    /// Use the colors as-is; defaults to the configured setting
    #[serde(default)]
    pub strict_swatches: Option<bool>,
    /// Gradient length when not strict; defaults to the configured setting
    #[serde(default)]
    pub steps: Option<usize>,
}

/// Derived palette
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaletteResponse {
    /// Palette entries as `#rrggbb`
    pub palette: Vec<String>,
}

/// Available palette presets
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresetsResponse {
    /// Preset used when a request names none
    pub default: String,
    pub presets: BTreeMap<String, Vec<String>>,
}

/// Derive a palette from picked colors
#[utoipa::path(
    post,
    path = "/api/palette",
    request_body = PaletteRequest,
    responses(
        (status = 200, description = "Derived palette", body = PaletteResponse),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Unknown color, wrong color count or step count"),
    ),
    tag = "Palettes"
)]
pub async fn handle_palette(
    State(service): State<Arc<PosterService>>,
    payload: Result<Json<PaletteRequest>, JsonRejection>,
) -> Result<Json<PaletteResponse>, ApiError> {
    let request = parse_json(payload)?;
    let config = service.config();

    let colors = request
        .colors
        .iter()
        .map(|c| palette_deriver::parse_color(c))
        .collect::<Result<Vec<_>, _>>()?;
    let palette = palette_deriver::derive(
        &colors,
        request
            .strict_swatches
            .unwrap_or(config.defaults.strict_swatches),
        request.steps.unwrap_or(config.gradient_steps),
    )?;

    tracing::debug!(input = colors.len(), output = palette.len(), "Derived palette");

    Ok(Json(PaletteResponse {
        palette: palette.colors().iter().map(ToString::to_string).collect(),
    }))
}

/// List palette presets
#[utoipa::path(
    get,
    path = "/api/palettes",
    responses(
        (status = 200, description = "Configured and built-in presets", body = PresetsResponse),
    ),
    tag = "Palettes"
)]
pub async fn handle_palettes(State(service): State<Arc<PosterService>>) -> Json<PresetsResponse> {
    let config = service.config();
    Json(PresetsResponse {
        default: config.defaults.palette.clone(),
        presets: config.presets(),
    })
}
