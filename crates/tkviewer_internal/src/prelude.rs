//! Prelude module for `tkviewer_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```no_run
//! use tkviewer_internal::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Now you can use all common types directly
//! let archive = DatFile::open("tile.dat")?;
//! let palettes = PalFile::open("tile.pal")?;
//!
//! // Rasterize a frame from a sheet stored in the archive
//! let sheet = EpfFile::from_bytes(&archive.get("tile0.epf").ok_or("missing sheet")?.data)?;
//! let image = rasterize(&sheet.frame(0)?, &palettes, 0, 0);
//! # Ok(())
//! # }
//! ```

// Re-export everything from tkviewer_types::prelude
#[doc(inline)]
pub use tkviewer_types::prelude::*;

// Re-export the entire tkviewer_types module for advanced usage
#[doc(inline)]
pub use tkviewer_types;
