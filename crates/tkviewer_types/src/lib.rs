//! This crate provides core data types and file format support for the `tkviewer-rs` project.
//!
//! # File Formats
//!
//! - **DAT**: Archive containers mapping entry names to byte blobs
//! - **PAL**: Palette files holding one or more 256-color sub-palettes
//! - **EPF**: Sprite sheets of palette-indexed frames with visibility stencils
//! - **DNA**: Animation descriptor tables for mobs and equipment parts
//!
//! # Rendering
//!
//! The [`render`] module turns decoded files back into RGBA images: frame
//! rasterization with color cycling, pivot-aligned compositing of layered
//! animations, and per-asset-family renderers with caching.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use tkviewer_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Pull a sprite sheet and palette out of an archive
//! let archive = DatFile::open("tile.dat")?;
//! let sheet = EpfFile::from_bytes(&archive.get("tile0.epf").ok_or("missing sheet")?.data)?;
//! let palettes = PalFile::from_bytes(&archive.get("tile.pal").ok_or("missing palette")?.data)?;
//!
//! // Rasterize the first frame
//! let image = rasterize(&sheet.frame(0)?, &palettes, 0, 0);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use tkviewer_types::file::{DatFile, DatVariant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = DatFile::open_variant("tile.dat", DatVariant::Baram)?;
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod render;

/// `use tkviewer_types::prelude::*;` to import commonly used items.
pub mod prelude;
