//! Integration tests for the palette endpoints.

mod common;

use axum::http::StatusCode;
use common::*;
use posterkit::api::{PaletteResponse, PresetsResponse};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_strict_swatches_are_normalized() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/palette",
            &json!({ "colors": ["Black", "#F00", "00ff00"], "strict_swatches": true }),
        )
        .await;

    assert_ok(&response);
    let palette: PaletteResponse = response.json();
    assert_eq!(palette.palette, vec!["#000000", "#ff0000", "#00ff00"]);
}

#[tokio::test]
async fn test_gradient() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/palette",
            &json!({ "colors": ["#000000", "#ffffff"], "strict_swatches": false, "steps": 3 }),
        )
        .await;

    assert_ok(&response);
    let palette: PaletteResponse = response.json();
    assert_eq!(palette.palette, vec!["#000000", "#808080", "#ffffff"]);
}

#[tokio::test]
async fn test_gradient_uses_configured_steps() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/palette",
            &json!({ "colors": ["black", "white"], "strict_swatches": false }),
        )
        .await;

    assert_ok(&response);
    let palette: PaletteResponse = response.json();
    assert_eq!(palette.palette.len(), app.state.config.gradient_steps);
    assert_eq!(palette.palette.first().map(String::as_str), Some("#000000"));
    assert_eq!(palette.palette.last().map(String::as_str), Some("#ffffff"));
}

#[tokio::test]
async fn test_palette_errors() {
    let app = TestApp::new();

    let too_few = app
        .post_json("/api/palette", &json!({ "colors": ["#000000"] }))
        .await;
    assert_api_error(&too_few, StatusCode::UNPROCESSABLE_ENTITY);

    let too_many = app
        .post_json("/api/palette", &json!({ "colors": vec!["#000000"; 9] }))
        .await;
    assert_api_error(&too_many, StatusCode::UNPROCESSABLE_ENTITY);

    let unknown = app
        .post_json("/api/palette", &json!({ "colors": ["#000000", "sparkly"] }))
        .await;
    assert_api_error(&unknown, StatusCode::UNPROCESSABLE_ENTITY);

    let missing = app.post_json("/api/palette", &json!({})).await;
    assert_api_error(&missing, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_presets() {
    let mut config = TestApp::test_config();
    config
        .palettes
        .insert("mono".to_string(), vec!["#111111".into(), "#eeeeee".into()]);
    config
        .palettes
        .insert("sea".to_string(), vec!["#003049".into(), "#eae2b7".into()]);
    let app = TestApp::with_config(config);

    let response = app.get("/api/palettes").await;

    assert_ok(&response);
    let presets: PresetsResponse = response.json();
    assert_eq!(presets.default, "mono");
    assert_eq!(presets.presets["mono"], vec!["#111111", "#eeeeee"]);
    assert_eq!(presets.presets["sea"], vec!["#003049", "#eae2b7"]);
    assert!(presets.presets.contains_key("duotone"));
    assert!(presets.presets.contains_key("risograph"));
}
