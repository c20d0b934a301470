//! Palette types and utilities
//!
//! This module provides the [`Palette`] type and the error types for
//! parsing and validation.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::Palette;
