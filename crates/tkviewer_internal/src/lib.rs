//! This module is separated into its own crate to keep the `tkviewer` facade thin, and should not be used directly.

/// `use tkviewer::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export tkviewer_types for convenience
pub use tkviewer_types;

// Re-export commonly used types at crate root
pub use tkviewer_types::file::{
	DatFile, DatVariant, DnaFile, Entry, EpfFile, PalFile, TkFileError,
};
pub use tkviewer_types::render::{AssetRenderer, RasterImage, TimedImage};
