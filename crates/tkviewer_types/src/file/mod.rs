//! File type support for `tkviewer-rs` project.

mod error;

pub mod dat;
pub mod dna;
pub mod epf;
pub mod pal;

// Re-export unified error type
pub use error::{FileType, TkFileError};

// Re-export main file types
pub use dat::{Entry, File as DatFile, ScanOutcome, Variant as DatVariant};
pub use dna::{
	Block, Chunk, Descriptor, File as DnaFile, Kind as DescriptorKind,
};
pub use epf::{File as EpfFile, FrameIterator, frame::Frame, frame::FrameEntry};
pub use pal::{Color, File as PalFile, Palette, Quantizer};
