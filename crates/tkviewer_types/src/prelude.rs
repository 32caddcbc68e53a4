//! Prelude module for `tkviewer_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use tkviewer_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Now you can use all common types directly
//! let archive = DatFile::open("char.dat")?;
//! let table = DnaFile::open("mon.dna", DescriptorKind::Mob)?;
//! # Ok(())
//! # }
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Block descriptor types
	Block,
	Chunk,

	// Palette types
	Color,

	// DAT types
	DatFile,
	DatVariant,
	Descriptor,
	DescriptorKind,
	// DNA types
	DnaFile,

	Entry,
	// EPF types
	EpfFile,

	FileType,
	Frame,
	FrameEntry,
	FrameIterator,

	PalFile,
	Palette,
	Quantizer,
	ScanOutcome,

	TkFileError,
};

// Render pipeline types
#[doc(inline)]
pub use crate::render::{
	AssetRenderer, EffectRenderer, MobRenderer, PLACEHOLDER_DIM, PartRenderer, PivotBounds,
	RasterImage, RenderCache, TileRenderer, TimedImage,
};

#[doc(inline)]
pub use crate::render::{aggregate, merge, place_frame, rasterize};

// Re-export the file and render modules for advanced usage
#[doc(inline)]
pub use crate::file;

#[doc(inline)]
pub use crate::render;
