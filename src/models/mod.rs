pub mod config;
pub mod options;

pub use config::{AppConfig, DefaultOptions, BUILTIN_PALETTES};
pub use options::{OptionsOverride, PaletteChoice};
