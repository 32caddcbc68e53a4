//! Error types for file format parsing and manipulation.

use thiserror::Error;

/// File formats handled by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Flat archive container (`.DAT`)
	Dat,
	/// Palette store (`.PAL`)
	Pal,
	/// Sprite sheet (`.EPF`)
	Epf,
	/// Animation descriptor table (`.DNA`/`.DSC`)
	Dna,
}

impl std::fmt::Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			FileType::Dat => "DAT",
			FileType::Pal => "PAL",
			FileType::Epf => "EPF",
			FileType::Dna => "DNA",
		};
		write!(f, "{}", name)
	}
}

/// Unified error type shared by all file formats in this crate.
#[derive(Debug, Error)]
pub enum TkFileError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// File format being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic tag
	#[error("{file_type}: invalid magic: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// File format being parsed
		file_type: FileType,
		/// Expected magic bytes
		expected: Vec<u8>,
		/// Magic bytes found in the input
		actual: Vec<u8>,
	},

	/// Invalid entry count in a header
	#[error("{file_type}: invalid entry count {count}")]
	InvalidEntryCount {
		/// File format being parsed
		file_type: FileType,
		/// Count value found in the header
		count: u32,
	},

	/// Data region length does not fit the format
	#[error("{file_type}: invalid data region length {length}")]
	InvalidDataLength {
		/// File format being parsed
		file_type: FileType,
		/// Length of the offending region in bytes
		length: usize,
	},

	/// Entry size computed from consecutive offsets would be negative
	#[error("{file_type}: entry {index} has negative size (start 0x{start:08X}, end 0x{end:08X})")]
	NegativeEntrySize {
		/// File format being parsed
		file_type: FileType,
		/// Index of the offending entry
		index: usize,
		/// Offset where the entry starts
		start: u32,
		/// Offset where the entry ends
		end: u32,
	},

	/// Index out of range
	#[error("{file_type}: index {index} out of range (len {len})")]
	IndexOutOfRange {
		/// File format being accessed
		file_type: FileType,
		/// Index that was requested
		index: usize,
		/// Number of items available
		len: usize,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),

	/// Slice conversion error
	#[error(transparent)]
	SliceError(#[from] std::array::TryFromSliceError),
}

impl TkFileError {
	/// Creates an `InsufficientData` error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an `InvalidMagic` error.
	pub fn invalid_magic(file_type: FileType, expected: &[u8], actual: &[u8]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: expected.to_vec(),
			actual: actual.to_vec(),
		}
	}

	/// Creates an `IndexOutOfRange` error.
	pub fn index_out_of_range(file_type: FileType, index: usize, len: usize) -> Self {
		Self::IndexOutOfRange {
			file_type,
			index,
			len,
		}
	}
}
