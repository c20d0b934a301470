pub mod palette;
pub mod preview;
pub mod process;

pub use palette::{handle_palette, handle_palettes, PaletteRequest, PaletteResponse, PresetsResponse};
pub use palette::{__path_handle_palette, __path_handle_palettes};
pub use preview::{handle_preview, __path_handle_preview};
pub use process::{handle_process, OutputFormat, ProcessRequest, __path_handle_process};
