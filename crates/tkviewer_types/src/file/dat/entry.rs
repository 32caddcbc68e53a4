//! Archive entry structure for DAT container files.

use std::fmt::Display;

/// A single named entry inside a DAT archive.
///
/// Names are ASCII, stored NUL-terminated in a fixed-width field on disk.
/// The payload is an opaque byte blob; nested formats (EPF, PAL, DNA) are
/// decoded by their own modules.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	/// Entry name as stored in the table of contents
	pub name: String,
	/// Raw payload bytes
	pub data: Vec<u8>,
}

impl Entry {
	/// Creates a new entry with the given name and payload.
	pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}

	/// Returns the payload size in bytes.
	pub fn size(&self) -> usize {
		self.data.len()
	}

	/// Returns the lower-cased extension of the entry name, if any.
	pub fn extension(&self) -> Option<String> {
		let (_, ext) = self.name.rsplit_once('.')?;
		Some(ext.to_ascii_lowercase())
	}
}

impl Display for Entry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Entry {{ name: '{}', size: {} }}", self.name, self.data.len())
	}
}
