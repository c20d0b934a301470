pub mod export;
pub mod palette_deriver;
pub mod preview;
pub mod processor;
pub mod source;

pub use export::ExportFormat;
pub use preview::{PreviewRegistry, PreviewSession};
pub use processor::{PosterService, Rendered};
pub use source::BitmapSource;
