//! `.DAT` archive container support for `tkviewer-rs`.
//!
//! DAT files are the flat archive containers the game client ships all of its
//! assets in: sprite sheets (`.epf`), palettes (`.pal`), animation descriptor
//! tables and anything else the client loads at runtime. An archive is a table
//! of contents with absolute data offsets, followed by the raw entry payloads
//! packed back to back.
//!
//! # File Structure
//!
//! All integers are little-endian. `W` is the name field width: 13 bytes for
//! standard archives, 32 for the Baram-era variant.
//!
//! ```text
//! Offset           Size  Field
//! ------           ----  ------------------------------------------------
//! 0x00             4     declared_count (u32) = entry count N + 1
//! 0x04             4+W   TOC record 0: data offset (u32) + name
//! ...              4+W   TOC records 1..N
//! 4 + N*(4+W)      4     sentinel offset (u32) = end of payload
//! then                   entry payloads, back to back
//! ```
//!
//! Names are NUL-terminated inside the fixed-width field; bytes after the
//! terminator are padding. An entry's size is not stored: it is the next
//! record's data offset (or the sentinel, for the last entry) minus its own.
//!
//! # Usage Examples
//!
//! ## Loading an archive and looking up entries
//!
//! ```no_run
//! use tkviewer_types::file::dat::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = File::open("tile.dat")?;
//!
//! println!("{} entries", archive.len());
//!
//! // Lookups are case-insensitive, like the client's own loader
//! if let Some(entry) = archive.get("TILE0.EPF") {
//!     println!("{}: {} bytes", entry.name, entry.size());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Bulk-decoding the sprite sheets inside an archive
//!
//! ```no_run
//! use tkviewer_types::file::dat::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = File::open("char.dat")?;
//!
//! let scan = archive.extract_sprites();
//! for (name, sheet) in &scan.loaded {
//!     println!("{}: {} frames", name, sheet.frame_count());
//! }
//! for (name, err) in &scan.failures {
//!     eprintln!("skipped {}: {}", name, err);
//! }
//! # Ok(())
//! # }
//! ```

use std::{fmt::Formatter, io::Read};

use crate::file::{FileType, TkFileError, epf, pal};

mod entry;

pub use entry::Entry;

/// DAT archive constants.
pub mod constants {
	/// Name field width in standard archives (12 characters + NUL)
	pub const STANDARD_NAME_LEN: usize = 13;

	/// Name field width in Baram-era archives (31 characters + NUL)
	pub const BARAM_NAME_LEN: usize = 32;
}

/// Archive layout variant, selecting the width of the TOC name field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
	/// Standard client archives, 13-byte name field
	#[default]
	Standard,
	/// Baram-era archives, 32-byte name field
	Baram,
}

impl Variant {
	/// Returns the name field width in bytes for this variant.
	pub const fn name_len(self) -> usize {
		match self {
			Variant::Standard => constants::STANDARD_NAME_LEN,
			Variant::Baram => constants::BARAM_NAME_LEN,
		}
	}

	/// Returns the size of one TOC record (offset + name field).
	pub const fn record_size(self) -> usize {
		4 + self.name_len()
	}
}

impl std::fmt::Display for Variant {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Variant::Standard => write!(f, "Standard"),
			Variant::Baram => write!(f, "Baram"),
		}
	}
}

/// Result of bulk-decoding the entries of one archive.
///
/// Malformed entries never abort a scan: they are recorded in `failures`
/// while the rest of the archive keeps loading.
#[derive(Debug)]
pub struct ScanOutcome<T> {
	/// Successfully decoded entries, as (entry name, decoded file) pairs
	pub loaded: Vec<(String, T)>,
	/// Entries that failed to decode, with the error that stopped them
	pub failures: Vec<(String, TkFileError)>,
}

impl<T> ScanOutcome<T> {
	/// Returns true if every matching entry decoded successfully.
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

impl<T> Default for ScanOutcome<T> {
	fn default() -> Self {
		Self {
			loaded: Vec::new(),
			failures: Vec::new(),
		}
	}
}

/// DAT archive file.
///
/// Entries keep their on-disk order; lookups are linear and
/// case-insensitive by default, matching the client's loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	variant: Variant,
	entries: Vec<Entry>,
}

impl File {
	/// Creates an empty standard archive.
	pub fn new() -> Self {
		Self::with_variant(Variant::Standard)
	}

	/// Creates an empty archive with the given layout variant.
	pub fn with_variant(variant: Variant) -> Self {
		Self {
			variant,
			entries: Vec::new(),
		}
	}

	/// Opens a standard archive from the given path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the archive
	/// structure is malformed.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, TkFileError> {
		Self::open_variant(path, Variant::Standard)
	}

	/// Opens an archive from the given path with an explicit layout variant.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the archive
	/// structure is malformed.
	pub fn open_variant(
		path: impl AsRef<std::path::Path>,
		variant: Variant,
	) -> Result<Self, TkFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes_variant(&data, variant)
	}

	/// Loads a standard archive from a byte slice.
	///
	/// # Errors
	///
	/// Returns an error if the archive structure is malformed.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TkFileError> {
		Self::from_bytes_variant(data, Variant::Standard)
	}

	/// Loads an archive from a byte slice with an explicit layout variant.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The declared count is zero (the entry count would be negative)
	/// - The table of contents or a payload runs past the end of the input
	/// - Consecutive offsets produce a negative entry size
	pub fn from_bytes_variant(data: &[u8], variant: Variant) -> Result<Self, TkFileError> {
		let name_len = variant.name_len();
		let record_size = variant.record_size();

		if data.len() < 4 {
			return Err(TkFileError::insufficient_data(FileType::Dat, 4, data.len()));
		}

		let declared = u32::from_le_bytes(data[0..4].try_into()?);
		if declared == 0 {
			return Err(TkFileError::InvalidEntryCount {
				file_type: FileType::Dat,
				count: declared,
			});
		}
		let count = (declared - 1) as usize;

		// TOC records plus the trailing sentinel offset
		let toc_size = 4 + count * record_size + 4;
		if data.len() < toc_size {
			return Err(TkFileError::insufficient_data(FileType::Dat, toc_size, data.len()));
		}

		let mut entries = Vec::with_capacity(count);
		for i in 0..count {
			let record = 4 + i * record_size;
			let start = u32::from_le_bytes(data[record..record + 4].try_into()?);

			let name_field = &data[record + 4..record + 4 + name_len];
			let name_end = name_field.iter().position(|&b| b == 0).unwrap_or(name_len);
			let name = String::from_utf8_lossy(&name_field[..name_end]).to_string();

			// The next record's offset field doubles as this entry's end;
			// for the last entry that is the sentinel.
			let next_record = 4 + (i + 1) * record_size;
			let end = u32::from_le_bytes(data[next_record..next_record + 4].try_into()?);

			if end < start {
				return Err(TkFileError::NegativeEntrySize {
					file_type: FileType::Dat,
					index: i,
					start,
					end,
				});
			}

			let (start, end) = (start as usize, end as usize);
			if end > data.len() {
				return Err(TkFileError::insufficient_data(FileType::Dat, end, data.len()));
			}

			entries.push(Entry::new(name, data[start..end].to_vec()));
		}

		Ok(Self {
			variant,
			entries,
		})
	}

	/// Loads a standard archive from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the archive structure is malformed.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TkFileError> {
		Self::from_reader_variant(reader, Variant::Standard)
	}

	/// Loads an archive from any reader with an explicit layout variant.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the archive structure is malformed.
	pub fn from_reader_variant<R: Read>(
		reader: &mut R,
		variant: Variant,
	) -> Result<Self, TkFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes_variant(&data, variant)
	}

	/// Returns the layout variant this archive was read with.
	pub fn variant(&self) -> Variant {
		self.variant
	}

	/// Returns a reference to the entries in on-disk order.
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the archive has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Gets an entry by index.
	pub fn get_entry(&self, index: usize) -> Option<&Entry> {
		self.entries.get(index)
	}

	/// Finds an entry by name, ignoring ASCII case.
	pub fn get(&self, name: &str) -> Option<&Entry> {
		self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
	}

	/// Finds an entry by exact name.
	pub fn get_sensitive(&self, name: &str) -> Option<&Entry> {
		self.entries.iter().find(|e| e.name == name)
	}

	/// Inserts or replaces an entry.
	///
	/// If an entry with the same name already exists (ignoring ASCII case)
	/// its payload is replaced in place; otherwise the entry is appended,
	/// preserving insertion order.
	pub fn put(&mut self, name: impl Into<String>, data: Vec<u8>) {
		let name = name.into();
		if let Some(existing) = self.entries.iter_mut().find(|e| e.name.eq_ignore_ascii_case(&name))
		{
			existing.data = data;
		} else {
			self.entries.push(Entry::new(name, data));
		}
	}

	/// Removes an entry by name (ignoring ASCII case), returning it if present.
	pub fn remove(&mut self, name: &str) -> Option<Entry> {
		let index = self.entries.iter().position(|e| e.name.eq_ignore_ascii_case(name))?;
		Some(self.entries.remove(index))
	}

	/// Bulk-decodes every `.epf` entry as a sprite sheet.
	///
	/// Malformed entries are skipped and reported in the outcome instead of
	/// failing the whole scan.
	pub fn extract_sprites(&self) -> ScanOutcome<epf::File> {
		let mut outcome = ScanOutcome::default();
		for entry in &self.entries {
			if entry.extension().as_deref() != Some("epf") {
				continue;
			}
			match epf::File::from_bytes(&entry.data) {
				Ok(sheet) => outcome.loaded.push((entry.name.clone(), sheet)),
				Err(e) => outcome.failures.push((entry.name.clone(), e)),
			}
		}
		outcome
	}

	/// Bulk-decodes every `.pal` entry as a palette store.
	///
	/// Malformed entries are skipped and reported in the outcome instead of
	/// failing the whole scan.
	pub fn extract_palettes(&self) -> ScanOutcome<pal::File> {
		let mut outcome = ScanOutcome::default();
		for entry in &self.entries {
			if entry.extension().as_deref() != Some("pal") {
				continue;
			}
			match pal::File::from_bytes(&entry.data) {
				Ok(palettes) => outcome.loaded.push((entry.name.clone(), palettes)),
				Err(e) => outcome.failures.push((entry.name.clone(), e)),
			}
		}
		outcome
	}

	/// Serializes the archive to bytes.
	///
	/// The header is `4 + N * (4 + W) + 4` bytes (count, TOC records,
	/// sentinel); payload offsets are assigned cumulatively from there.
	/// Names longer than the name field are truncated to keep the
	/// terminating NUL.
	pub fn to_bytes(&self) -> Vec<u8> {
		let name_len = self.variant.name_len();
		let record_size = self.variant.record_size();
		let header_size = 4 + self.entries.len() * record_size + 4;
		let payload_size: usize = self.entries.iter().map(Entry::size).sum();

		let mut buffer = Vec::with_capacity(header_size + payload_size);
		buffer.extend_from_slice(&(self.entries.len() as u32 + 1).to_le_bytes());

		let mut offset = header_size as u32;
		for entry in &self.entries {
			buffer.extend_from_slice(&offset.to_le_bytes());

			let bytes = entry.name.as_bytes();
			let len = bytes.len().min(name_len - 1);
			buffer.extend_from_slice(&bytes[..len]);
			buffer.resize(buffer.len() + (name_len - len), 0);

			offset += entry.data.len() as u32;
		}
		buffer.extend_from_slice(&offset.to_le_bytes());

		for entry in &self.entries {
			buffer.extend_from_slice(&entry.data);
		}

		buffer
	}

	/// Saves the archive to disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), TkFileError> {
		std::fs::write(path, self.to_bytes())?;
		Ok(())
	}
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "DAT File ({}): {} entries", self.variant, self.entries.len())?;
		for entry in &self.entries {
			writeln!(f, "  {}", entry)?;
		}
		Ok(())
	}
}

impl TryFrom<&[u8]> for File {
	type Error = TkFileError;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl TryFrom<Vec<u8>> for File {
	type Error = TkFileError;

	fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
		Self::from_bytes(&value)
	}
}

impl TryFrom<&Vec<u8>> for File {
	type Error = TkFileError;

	fn try_from(value: &Vec<u8>) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl From<File> for Vec<u8> {
	fn from(file: File) -> Self {
		file.to_bytes()
	}
}

impl From<&File> for Vec<u8> {
	fn from(file: &File) -> Self {
		file.to_bytes()
	}
}

impl From<Vec<Entry>> for File {
	fn from(entries: Vec<Entry>) -> Self {
		Self {
			variant: Variant::Standard,
			entries,
		}
	}
}
