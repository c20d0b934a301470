//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::models::AppConfig;
use crate::services::{PosterService, PreviewRegistry};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<PosterService>,
    pub previews: Arc<PreviewRegistry>,
}

impl FromRef<AppState> for Arc<PosterService> {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

impl FromRef<AppState> for Arc<PreviewRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.previews.clone()
    }
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    let config = Arc::new(config);
    let service = Arc::new(PosterService::new(config.clone()));
    let previews = Arc::new(PreviewRegistry::new(Duration::from_millis(
        config.preview_debounce_ms,
    )));

    AppState {
        config,
        service,
        previews,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/api/process", post(api::handle_process))
        .route("/api/preview/:session", post(api::handle_preview))
        .route("/api/palette", post(api::handle_palette))
        .route("/api/palettes", get(api::handle_palettes))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        // Base64 payloads exceed axum's 2 MB default
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        // Every response is computed from the request body
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
