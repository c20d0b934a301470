//! Posterkit
//!
//! Turns photos into flat, limited-palette posters. The image pipeline
//! lives in `poster-pipeline`; this crate adds decoding, export, palette
//! presets, preview scheduling, the HTTP service and the CLI.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
