//! DNA animation descriptor table support
//!
//! DNA tables describe how animated assets (mobs and equipment parts) map onto
//! the frames of an EPF sprite sheet. A table is a flat run of descriptor
//! records with no file header and no record count; records are parsed until
//! the input is exhausted.
//!
//! ## Record layout
//!
//! Each descriptor record, all integers little-endian:
//!
//! | Field | Size | Description |
//! |-------|------|-------------|
//! | `base_frame` | 4 | Base index into the companion sprite sheet(s) |
//! | `chunk_count` | 2 or 4 | Number of chunk records (2 bytes for mob tables, 4 for part tables) |
//! | `marker` | 1 | Reserved marker byte, preserved verbatim |
//! | `palette_id` | 4 | Sub-palette used by every frame of this descriptor |
//! | chunks | variable | `chunk_count` chunk records |
//!
//! Each chunk record:
//!
//! | Field | Size | Description |
//! |-------|------|-------------|
//! | `block_count` | 4 | Number of block records |
//! | blocks | 20 each | `block_count` block records |
//!
//! Each block record is five `i32` fields: `frame_offset`, `duration`,
//! `transparency`, and two reserved fields retained for round-trip fidelity.
//! The sprite frame for a block is `base_frame + frame_offset`; a chunk plays
//! its blocks as a loop, each frame held for its block's duration in ticks.
//!
//! ## Example
//!
//! ```no_run
//! use tkviewer_types::file::dna::{File, Kind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = File::open("mon.dna", Kind::Mob)?;
//!
//! for descriptor in table.descriptors() {
//! 	println!(
//! 		"base frame {}, {} chunk(s), palette {}",
//! 		descriptor.base_frame,
//! 		descriptor.chunks.len(),
//! 		descriptor.palette_id
//! 	);
//! }
//! # Ok(())
//! # }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::file::{FileType, TkFileError};

/// DNA descriptor table constants
pub mod constants {
	/// Size of each chunk header (`block_count`) in bytes
	pub const CHUNK_HEADER_SIZE: usize = 4;

	/// Size of each block record in bytes
	pub const BLOCK_SIZE: usize = 20;
}

/// Asset family a descriptor table belongs to.
///
/// The families share one record layout except for the width of the
/// per-descriptor chunk count, so the kind must be supplied by the caller
/// rather than detected from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Kind {
	/// Monster tables, 2-byte chunk count
	#[default]
	Mob,
	/// Equipment part tables, 4-byte chunk count
	Part,
}

impl Kind {
	/// Returns the byte width of the chunk count field for this family
	pub const fn count_width(&self) -> usize {
		match self {
			Kind::Mob => 2,
			Kind::Part => 4,
		}
	}
}

impl std::fmt::Display for Kind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Kind::Mob => write!(f, "mob"),
			Kind::Part => write!(f, "part"),
		}
	}
}

/// One step of a chunk's animation loop.
///
/// `frame_offset` is added to the owning descriptor's `base_frame` to select
/// the sprite frame; `duration` is how long the frame is held, in ticks.
/// `transparency` is a blend hint and the reserved fields are carried through
/// unmodified so tables re-encode byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
	/// Signed offset from the descriptor's base frame
	pub frame_offset: i32,
	/// Display duration in ticks
	pub duration: i32,
	/// Transparency/blend hint, not interpreted here
	pub transparency: i32,
	/// Reserved field, preserved verbatim
	pub reserved_b: i32,
	/// Reserved field, preserved verbatim
	pub reserved_c: i32,
}

impl Block {
	/// Creates a block with the given frame offset and duration
	pub fn new(frame_offset: i32, duration: i32) -> Self {
		Self {
			frame_offset,
			duration,
			..Self::default()
		}
	}
}

/// One visual layer of a descriptor: an ordered loop of blocks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chunk {
	/// Blocks in playback order
	pub blocks: Vec<Block>,
}

impl Chunk {
	/// Creates a chunk from a list of blocks
	pub fn new(blocks: Vec<Block>) -> Self {
		Self { blocks }
	}

	/// Returns true if the chunk has no blocks to play
	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}
}

/// One animated asset: a base frame, a palette, and its layered chunks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Descriptor {
	/// Base index into the companion sprite sheet(s)
	pub base_frame: u32,
	/// Reserved marker byte, preserved verbatim
	pub marker: u8,
	/// Sub-palette index for every frame of this descriptor
	pub palette_id: u32,
	/// Visual layers, lowest first
	pub chunks: Vec<Chunk>,
}

impl Descriptor {
	/// Resolves a block's sprite frame index.
	///
	/// Returns `None` when `base_frame + frame_offset` is negative, which a
	/// malformed table can produce.
	pub fn frame_index(&self, block: &Block) -> Option<usize> {
		let index = i64::from(self.base_frame) + i64::from(block.frame_offset);
		usize::try_from(index).ok()
	}
}

/// DNA file structure, representing a table of animation descriptors
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
	kind: Kind,
	descriptors: Vec<Descriptor>,
}

impl File {
	/// Creates a new empty descriptor table of the given family
	pub fn new(kind: Kind) -> Self {
		Self {
			kind,
			descriptors: Vec::new(),
		}
	}

	/// Opens a descriptor table from the specified path.
	///
	/// # Arguments
	///
	/// * `path` - Path to the DNA file.
	/// * `kind` - Asset family the table belongs to.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or a record is truncated.
	pub fn open(path: impl AsRef<std::path::Path>, kind: Kind) -> Result<Self, TkFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data, kind)
	}

	/// Parses a descriptor table from a byte buffer.
	///
	/// Records are read back to back until the buffer is exhausted; an empty
	/// buffer is a valid empty table.
	///
	/// # Errors
	///
	/// Returns [`TkFileError::InsufficientData`] if the buffer ends inside a
	/// record.
	pub fn from_bytes(data: &[u8], kind: Kind) -> Result<Self, TkFileError> {
		let mut cursor = Cursor::new(data);
		let mut descriptors = Vec::new();

		while cursor.remaining() > 0 {
			descriptors.push(Self::read_descriptor(&mut cursor, kind)?);
		}

		Ok(Self { kind, descriptors })
	}

	/// Parses a descriptor table from a reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or a record is truncated.
	pub fn from_reader<R: Read>(reader: &mut R, kind: Kind) -> Result<Self, TkFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data, kind)
	}

	fn read_descriptor(cursor: &mut Cursor<'_>, kind: Kind) -> Result<Descriptor, TkFileError> {
		let base_frame = cursor.read_u32()?;
		let chunk_count = match kind {
			Kind::Mob => usize::from(cursor.read_u16()?),
			Kind::Part => cursor.read_u32()? as usize,
		};
		let marker = cursor.read_u8()?;
		let palette_id = cursor.read_u32()?;

		// Every chunk needs at least a header, so a count larger than the
		// remaining bytes can never parse
		let min_len = chunk_count.saturating_mul(constants::CHUNK_HEADER_SIZE);
		if min_len > cursor.remaining() {
			return Err(TkFileError::insufficient_data(
				FileType::Dna,
				cursor.position() + min_len,
				cursor.len(),
			));
		}

		let mut chunks = Vec::with_capacity(chunk_count);
		for _ in 0..chunk_count {
			chunks.push(Self::read_chunk(cursor)?);
		}

		Ok(Descriptor {
			base_frame,
			marker,
			palette_id,
			chunks,
		})
	}

	fn read_chunk(cursor: &mut Cursor<'_>) -> Result<Chunk, TkFileError> {
		let block_count = cursor.read_u32()? as usize;

		let min_len = block_count.saturating_mul(constants::BLOCK_SIZE);
		if min_len > cursor.remaining() {
			return Err(TkFileError::insufficient_data(
				FileType::Dna,
				cursor.position() + min_len,
				cursor.len(),
			));
		}

		let mut blocks = Vec::with_capacity(block_count);
		for _ in 0..block_count {
			blocks.push(Block {
				frame_offset: cursor.read_i32()?,
				duration: cursor.read_i32()?,
				transparency: cursor.read_i32()?,
				reserved_b: cursor.read_i32()?,
				reserved_c: cursor.read_i32()?,
			});
		}

		Ok(Chunk { blocks })
	}

	/// Returns the asset family this table was parsed as
	#[inline]
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// Returns all descriptors in table order
	#[inline]
	pub fn descriptors(&self) -> &[Descriptor] {
		&self.descriptors
	}

	/// Returns a reference to a specific descriptor.
	///
	/// # Arguments
	///
	/// * `index` - Descriptor index (0-based)
	#[inline]
	pub fn get(&self, index: usize) -> Option<&Descriptor> {
		self.descriptors.get(index)
	}

	/// Returns the number of descriptors in the table
	#[inline]
	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	/// Returns true if the table has no descriptors
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}

	/// Appends a descriptor to the table
	pub fn push_descriptor(&mut self, descriptor: Descriptor) {
		self.descriptors.push(descriptor);
	}

	/// Serializes the table back to its binary representation.
	///
	/// A table decoded with the same [`Kind`] re-encodes byte for byte.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buffer = Vec::new();

		for descriptor in &self.descriptors {
			buffer.extend_from_slice(&descriptor.base_frame.to_le_bytes());
			match self.kind {
				Kind::Mob => {
					buffer.extend_from_slice(&(descriptor.chunks.len() as u16).to_le_bytes());
				}
				Kind::Part => {
					buffer.extend_from_slice(&(descriptor.chunks.len() as u32).to_le_bytes());
				}
			}
			buffer.push(descriptor.marker);
			buffer.extend_from_slice(&descriptor.palette_id.to_le_bytes());

			for chunk in &descriptor.chunks {
				buffer.extend_from_slice(&(chunk.blocks.len() as u32).to_le_bytes());
				for block in &chunk.blocks {
					buffer.extend_from_slice(&block.frame_offset.to_le_bytes());
					buffer.extend_from_slice(&block.duration.to_le_bytes());
					buffer.extend_from_slice(&block.transparency.to_le_bytes());
					buffer.extend_from_slice(&block.reserved_b.to_le_bytes());
					buffer.extend_from_slice(&block.reserved_c.to_le_bytes());
				}
			}
		}

		buffer
	}

	/// Saves the table to the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), TkFileError> {
		std::fs::write(path, self.to_bytes())?;
		Ok(())
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "DNA table ({}): {} descriptor(s)", self.kind, self.descriptors.len())?;
		for (index, descriptor) in self.descriptors.iter().enumerate() {
			writeln!(
				f,
				"  {index}: base frame {}, {} chunk(s), palette {}",
				descriptor.base_frame,
				descriptor.chunks.len(),
				descriptor.palette_id
			)?;
		}
		Ok(())
	}
}

impl From<&File> for Vec<u8> {
	fn from(file: &File) -> Self {
		file.to_bytes()
	}
}

/// Bounds-checked reader over a descriptor table buffer
struct Cursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	fn len(&self) -> usize {
		self.data.len()
	}

	fn position(&self) -> usize {
		self.pos
	}

	fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8], TkFileError> {
		let end = self.pos + len;
		if end > self.data.len() {
			return Err(TkFileError::insufficient_data(FileType::Dna, end, self.data.len()));
		}
		let slice = &self.data[self.pos..end];
		self.pos = end;
		Ok(slice)
	}

	fn read_u8(&mut self) -> Result<u8, TkFileError> {
		Ok(self.take(1)?[0])
	}

	fn read_u16(&mut self) -> Result<u16, TkFileError> {
		Ok(u16::from_le_bytes(self.take(2)?.try_into()?))
	}

	fn read_u32(&mut self) -> Result<u32, TkFileError> {
		Ok(u32::from_le_bytes(self.take(4)?.try_into()?))
	}

	fn read_i32(&mut self) -> Result<i32, TkFileError> {
		Ok(i32::from_le_bytes(self.take(4)?.try_into()?))
	}
}
