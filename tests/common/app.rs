//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use posterkit::models::AppConfig;
use posterkit::server::{build_router, create_app_state, AppState};

/// Test application driving the router in-process
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with default configuration and no
    /// preview debounce
    pub fn new() -> Self {
        Self::with_config(Self::test_config())
    }

    /// Create a test application from a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = create_app_state(config);

        // Build router using shared server module (same as production)
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// Defaults with the debounce disabled so tests stay fast
    pub fn test_config() -> AppConfig {
        AppConfig {
            preview_debounce_ms: 0,
            ..AppConfig::default()
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        self.post_raw(path, &body.to_string()).await
    }

    /// Make a POST request with an arbitrary body labelled as JSON
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Check if response is a JPEG image
    pub fn is_jpeg(&self) -> bool {
        self.body.starts_with(&[0xFF, 0xD8])
    }

    /// Decode the body as an RGBA image
    pub fn image(&self) -> image::RgbaImage {
        image::load_from_memory(&self.body)
            .expect("Failed to decode image body")
            .to_rgba8()
    }
}
